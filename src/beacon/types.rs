//! Beacon API response types
//!
//! The beacon node wraps every payload in a `{"data": ...}` envelope and
//! encodes integers as decimal strings.

use serde::{Deserialize, Serialize};

/// Top-level response envelope shared by all beacon endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Serde helpers for integers the beacon API sends as strings
pub(crate) mod quoted_u64 {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct QuotedVisitor;

        impl<'de> Visitor<'de> for QuotedVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an unsigned integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(QuotedVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveExiting,
    ActiveSlashed,
    ExitedUnslashed,
    ExitedSlashed,
    WithdrawalPossible,
    WithdrawalDone,
    Active,
    Pending,
    Exited,
    Withdrawal,
}

/// Validator record as stored in the beacon state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    #[serde(with = "quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,
    #[serde(with = "quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub exit_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub withdrawable_epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorData {
    #[serde(with = "quoted_u64")]
    pub index: u64,
    #[serde(with = "quoted_u64")]
    pub balance: u64,
    pub status: ValidatorStatus,
    pub validator: Validator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorBalance {
    #[serde(with = "quoted_u64")]
    pub index: u64,
    #[serde(with = "quoted_u64")]
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConsolidation {
    #[serde(with = "quoted_u64")]
    pub source_index: u64,
    #[serde(with = "quoted_u64")]
    pub target_index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDeposit {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    #[serde(with = "quoted_u64")]
    pub amount: u64,
    pub signature: String,
    #[serde(with = "quoted_u64")]
    pub slot: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPartialWithdrawal {
    #[serde(with = "quoted_u64")]
    pub validator_index: u64,
    #[serde(with = "quoted_u64")]
    pub amount: u64,
    #[serde(with = "quoted_u64")]
    pub withdrawable_epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genesis {
    #[serde(with = "quoted_u64")]
    pub genesis_time: u64,
    #[serde(default)]
    pub genesis_validators_root: String,
    #[serde(default)]
    pub genesis_fork_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(with = "quoted_u64")]
    pub epoch: u64,
    pub root: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalityCheckpoints {
    pub previous_justified: Checkpoint,
    pub current_justified: Checkpoint,
    pub finalized: Checkpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    #[serde(with = "quoted_u64")]
    pub head_slot: u64,
    #[serde(with = "quoted_u64")]
    pub sync_distance: u64,
    pub is_syncing: bool,
    #[serde(default)]
    pub is_optimistic: Option<bool>,
    #[serde(default)]
    pub el_offline: Option<bool>,
}
