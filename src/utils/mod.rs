//! Leaf helpers shared by the clients and the CLI

pub mod address;
pub mod chunks;
pub mod hash;
pub mod pubkeys;
pub mod time;
pub mod units;

pub use address::{is_address, is_null_address, normalize_address, ADDRESS_ZERO};
pub use chunks::{divide_chunks, DEFAULT_CHUNK_SIZE};
pub use hash::hash_event_param;
pub use pubkeys::{load_public_keys_from_files, split_validator_pubkey_bytes, PUBKEY_LENGTH};
pub use time::{compute_time_at_slot, current_utc_timestamp, SECONDS_PER_SLOT};
pub use units::{convert_to_standard_notation, gwei_to_wei, StandardNotation};
