//! Transient-error classification
//!
//! Pure predicates used by the retry policy. An error is retried only when
//! one of these returns `true`; everything else propagates on first
//! occurrence.

use crate::errors::{BeaconError, RpcError};

/// HTTP statuses worth another attempt: rate limiting and upstream failures
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Message fragment nodes emit when an upstream request timed out
const TIMEOUT_MESSAGE: &str = "request failed or timed out";

/// Check for a retryable HTTP status code
///
/// # Examples
/// ```
/// use web3_utils::retry::is_retryable_status;
///
/// assert!(is_retryable_status(429));
/// assert!(is_retryable_status(504));
/// assert!(!is_retryable_status(404));
/// ```
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// Check if an RPC error message reports an upstream request timeout
pub fn is_timeout_message(message: &str) -> bool {
    message.contains(TIMEOUT_MESSAGE)
}

/// Classifier for the beacon-chain adapter
///
/// Connection failures, client timeouts and retryable HTTP statuses are
/// transient. A 404 is not: single-validator lookups turn it into absence
/// before the classifier ever sees it.
pub fn is_retryable_beacon_error(error: &BeaconError) -> bool {
    match error {
        BeaconError::Connection(_) | BeaconError::Timeout(_) => true,
        BeaconError::Http { status, .. } => is_retryable_status(*status),
        BeaconError::Deserialisation(_)
        | BeaconError::BatchTooLarge { .. }
        | BeaconError::Worker(_) => false,
    }
}

/// Classifier for the execution JSON-RPC module
///
/// Broader than the beacon classifier: blocks and transactions that are not
/// yet visible may appear as the chain advances.
pub fn is_retryable_rpc_error(error: &RpcError) -> bool {
    match error {
        RpcError::BlockNotFound(_)
        | RpcError::TransactionNotFound(_)
        | RpcError::Connection(_)
        | RpcError::ConnectorConnection(_)
        | RpcError::Timeout(_) => true,
        RpcError::Http { status, .. } => is_retryable_status(*status),
        RpcError::Rpc { message, .. } => is_timeout_message(message),
        RpcError::Deserialisation(_) | RpcError::InvalidArgument(_) => false,
    }
}
