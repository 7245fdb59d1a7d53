//! Retry policy core
//!
//! This module provides the retry layer shared by the beacon-chain adapter
//! and the execution JSON-RPC module:
//! - **Classifier** - Pure predicates deciding whether an error is transient
//! - **Policy** - Fixed-delay retry loop with pluggable stop conditions and
//!   before-sleep logging, in async and blocking flavours

pub mod classifier;
pub mod policy;

// Re-export main types
pub use classifier::{
    is_retryable_beacon_error, is_retryable_rpc_error, is_retryable_status, is_timeout_message,
    RETRYABLE_STATUS_CODES,
};
pub use policy::{CallSite, RetryPolicy, RetryState, StopCondition, DEFAULT_WAIT};
