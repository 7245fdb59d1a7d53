//! Time utilities for slot arithmetic

use chrono::Utc;

/// Beacon chain slot duration in seconds
pub const SECONDS_PER_SLOT: u64 = 12;

/// Current UTC time as fractional Unix seconds
pub fn current_utc_timestamp() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Unix time at the start of `slot`, or `None` past `u64::MAX` seconds
///
/// # Examples
/// ```
/// use web3_utils::utils::time::compute_time_at_slot;
/// assert_eq!(compute_time_at_slot(1000, 10), Some(1120));
/// ```
pub fn compute_time_at_slot(genesis_time: u64, slot: u64) -> Option<u64> {
    slot.checked_mul(SECONDS_PER_SLOT)?.checked_add(genesis_time)
}
