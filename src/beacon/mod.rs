//! Beacon-chain HTTP API integration
//!
//! - **Transport** - Blocking HTTP GET seam (`reqwest::blocking`)
//! - **Client** - Typed synchronous endpoint methods with batch limits
//! - **AsyncBeacon** - Retry-wrapped adapter that offloads each call to the
//!   blocking pool and memoises genesis time
//! - **Types** - `{"data": ...}` envelope payloads

pub mod async_beacon;
pub mod client;
pub mod transport;
pub mod types;

// Re-export main types
pub use async_beacon::AsyncBeacon;
pub use client::{Beacon, DEFAULT_STATE_ID, MAX_BALANCE_INDEXES, MAX_VALIDATOR_IDS};
pub use transport::{BeaconTransport, HttpBeaconTransport, QueryParam};
pub use types::{
    Checkpoint, Envelope, FinalityCheckpoints, Genesis, PendingConsolidation, PendingDeposit,
    PendingPartialWithdrawal, SyncStatus, Validator, ValidatorBalance, ValidatorData,
    ValidatorStatus,
};
