//! Address validation and EIP-55 checksum encoding

use crate::errors::AddressError;
use alloy_primitives::keccak256;

/// The all-zero address in canonical form
pub const ADDRESS_ZERO: &str = "0x0000000000000000000000000000000000000000";

/// Shorthand form of the zero address
const ADDRESS_ZERO_SHORT: &str = "0x0";

/// Number of hex digits in an address
const ADDRESS_HEX_LEN: usize = 40;

/// Check whether `address` is a well-formed address
///
/// Accepts 40 hex digits with or without the `0x` prefix. All-lowercase and
/// all-uppercase inputs are accepted as-is; mixed-case inputs must carry a
/// valid checksum.
pub fn is_address(address: &str) -> bool {
    let hex = address.strip_prefix("0x").unwrap_or(address);
    if hex.len() != ADDRESS_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return to_checksum(hex) == format!("0x{}", hex);
    }
    true
}

/// Normalise an address to its checksum-encoded form
///
/// # Examples
/// ```
/// use web3_utils::utils::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0xc00f6cf15ab248989838aa01d25177ec2510a81d").unwrap(),
///     "0xC00f6cf15Ab248989838AA01D25177ec2510A81D"
/// );
/// assert!(normalize_address("0x1234").is_err());
/// ```
pub fn normalize_address(address: &str) -> Result<String, AddressError> {
    if !is_address(address) {
        return Err(AddressError::InvalidAddress(address.to_string()));
    }
    Ok(to_checksum(address.strip_prefix("0x").unwrap_or(address)))
}

/// EIP-55 encoding of 40 hex digits (no prefix)
fn to_checksum(hex: &str) -> String {
    let lower = hex.to_ascii_lowercase();
    let hash = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(ADDRESS_HEX_LEN + 2);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// True for the zero address in either canonical or `0x0` shorthand form
pub fn is_null_address(address: &str) -> bool {
    address == ADDRESS_ZERO || address == ADDRESS_ZERO_SHORT
}
