//! Unit conversion and number formatting
//!
//! Amounts are handled as exact decimal digit strings so that no value ever
//! passes through floating point on its way to wei.

use crate::errors::UnitsError;
use alloy_primitives::U256;

/// Decimal places between gwei and wei
pub const GWEI_DECIMALS: i64 = 9;

/// Decimal digits in `U256::MAX`; no integer part longer than this is rendered
const MAX_INTEGER_DIGITS: i64 = 78;

/// A decimal number as `digits * 10^exponent`
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecimalParts {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl DecimalParts {
    /// Parse `[-+]?digits[.digits][e[-+]?digits]`
    fn parse(input: &str) -> Result<Self, UnitsError> {
        let invalid = || UnitsError::InvalidAmount(input.to_string());
        let trimmed = input.trim();

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => {
                let exponent: i64 = unsigned[pos + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..pos], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", integer, fraction)
            .trim_start_matches('0')
            .to_string();

        Ok(Self {
            negative,
            digits,
            exponent: exponent.saturating_sub(fraction.len() as i64),
        })
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Integer digits after truncating the fractional part, or `None` when
    /// the integer part would be longer than [`MAX_INTEGER_DIGITS`]
    fn truncated_digits(&self) -> Option<String> {
        if self.is_zero() {
            return Some("0".to_string());
        }
        let integer_len = (self.digits.len() as i64).saturating_add(self.exponent);
        if integer_len > MAX_INTEGER_DIGITS {
            return None;
        }

        let digits = if self.exponent >= 0 {
            let mut digits = self.digits.clone();
            digits.push_str(&"0".repeat(self.exponent as usize));
            digits
        } else {
            let drop = self.exponent.unsigned_abs() as usize;
            if drop >= self.digits.len() {
                String::new()
            } else {
                self.digits[..self.digits.len() - drop].to_string()
            }
        };

        if digits.is_empty() {
            Some("0".to_string())
        } else {
            Some(digits)
        }
    }

    /// Exponents saturate; a saturated value is either far past
    /// [`MAX_INTEGER_DIGITS`] or truncates to zero
    fn shifted(mut self, places: i64) -> Self {
        self.exponent = self.exponent.saturating_add(places);
        self
    }
}

/// Convert a gwei amount to wei with exact decimal arithmetic
///
/// Fractions finer than one wei are truncated.
///
/// # Examples
/// ```
/// use web3_utils::utils::units::gwei_to_wei;
/// use alloy_primitives::U256;
///
/// assert_eq!(gwei_to_wei("1").unwrap(), U256::from(1_000_000_000u64));
/// assert_eq!(gwei_to_wei("1.5").unwrap(), U256::from(1_500_000_000u64));
/// ```
pub fn gwei_to_wei(gwei: &str) -> Result<U256, UnitsError> {
    let parts = DecimalParts::parse(gwei)?;
    if parts.negative && !parts.is_zero() {
        return Err(UnitsError::InvalidAmount(gwei.to_string()));
    }

    let wei = parts
        .shifted(GWEI_DECIMALS)
        .truncated_digits()
        .ok_or_else(|| UnitsError::Overflow(gwei.to_string()))?;
    U256::from_str_radix(&wei, 10).map_err(|_| UnitsError::Overflow(gwei.to_string()))
}

/// Numbers that can be rendered in plain integer notation
pub trait StandardNotation {
    /// Render with zero fractional digits, truncating toward zero
    fn to_standard_notation(&self) -> String;
}

impl StandardNotation for U256 {
    fn to_standard_notation(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_standard_notation_for_int {
    ($($t:ty),*) => {
        $(impl StandardNotation for $t {
            fn to_standard_notation(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_standard_notation_for_int!(u32, u64, u128, i32, i64, i128, usize);

impl StandardNotation for f64 {
    fn to_standard_notation(&self) -> String {
        if !self.is_finite() {
            return self.to_string();
        }
        let truncated = self.trunc();
        if truncated == 0.0 {
            "0".to_string()
        } else {
            format!("{:.0}", truncated)
        }
    }
}

/// Decimal strings; unparseable or out-of-range input is returned unchanged
impl StandardNotation for str {
    fn to_standard_notation(&self) -> String {
        let Ok(parts) = DecimalParts::parse(self) else {
            return self.to_string();
        };
        match parts.truncated_digits() {
            Some(digits) if parts.negative && digits != "0" => format!("-{}", digits),
            Some(digits) => digits,
            None => self.to_string(),
        }
    }
}

/// Render a numeric value with no fractional digits, truncating
///
/// # Examples
/// ```
/// use web3_utils::utils::units::convert_to_standard_notation;
///
/// assert_eq!(convert_to_standard_notation(&12.3456789_f64), "12");
/// assert_eq!(convert_to_standard_notation("1.5e3"), "1500");
/// ```
pub fn convert_to_standard_notation<N: StandardNotation + ?Sized>(value: &N) -> String {
    value.to_standard_notation()
}
