use crate::errors::AddressError;
use alloy_primitives::keccak256;

/// Keccak-256 of a hex-encoded `bytes` event parameter
///
/// Odd-length input is left-padded with a zero nibble.
pub fn hash_event_param(param: &str) -> Result<String, AddressError> {
    let raw = param.strip_prefix("0x").unwrap_or(param);
    let padded = if raw.len() % 2 == 1 {
        format!("0{}", raw)
    } else {
        raw.to_string()
    };

    let bytes = hex::decode(&padded).map_err(|_| AddressError::InvalidHex(param.to_string()))?;
    Ok(format!("0x{}", hex::encode(keccak256(&bytes))))
}
