use crate::beacon::transport::{BeaconTransport, QueryParam};
use crate::beacon::types::{
    Envelope, FinalityCheckpoints, Genesis, PendingConsolidation, PendingDeposit,
    PendingPartialWithdrawal, SyncStatus, ValidatorBalance, ValidatorData,
};
use crate::errors::{BeaconError, BeaconResult};
use serde::de::DeserializeOwned;

/// State identifier used when the caller does not pick one
pub const DEFAULT_STATE_ID: &str = "head";

/// Maximum ids per validators query
pub const MAX_VALIDATOR_IDS: usize = 50;

/// Maximum indexes per validator balances query
pub const MAX_BALANCE_INDEXES: usize = 250;

/// Synchronous typed client for the beacon node REST API
///
/// Every method performs exactly one blocking request through the
/// transport. Retry and offloading live in [`AsyncBeacon`](super::AsyncBeacon).
pub struct Beacon<T> {
    transport: T,
}

impl<T: BeaconTransport> Beacon<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Look up a single validator by public key or index
    pub fn get_validator(&self, validator_id: &str, state_id: &str) -> BeaconResult<ValidatorData> {
        self.fetch(
            &format!(
                "/eth/v1/beacon/states/{}/validators/{}",
                state_id, validator_id
            ),
            &[],
        )
    }

    /// Query validators by id and status filters
    ///
    /// Fails with [`BeaconError::BatchTooLarge`] before any I/O when more than
    /// [`MAX_VALIDATOR_IDS`] ids are requested.
    pub fn get_validators(
        &self,
        state_id: &str,
        ids: Option<&[String]>,
        statuses: Option<&[String]>,
    ) -> BeaconResult<Vec<ValidatorData>> {
        if let Some(ids) = ids {
            check_batch("validators", ids.len(), MAX_VALIDATOR_IDS)?;
        }

        let mut query: Vec<QueryParam> = Vec::new();
        if let Some(ids) = ids {
            query.push(("id", Some(ids.join(","))));
        }
        if let Some(statuses) = statuses {
            query.push(("status", Some(statuses.join(","))));
        }

        self.fetch(
            &format!("/eth/v1/beacon/states/{}/validators", state_id),
            &query,
        )
    }

    /// Balances for the given validator indexes
    ///
    /// The `id` parameter is always sent; without indexes it goes out as a
    /// null-valued parameter.
    pub fn get_validator_balances(
        &self,
        state_id: &str,
        indexes: Option<&[String]>,
    ) -> BeaconResult<Vec<ValidatorBalance>> {
        if let Some(indexes) = indexes {
            check_batch("validator_balances", indexes.len(), MAX_BALANCE_INDEXES)?;
        }

        self.fetch(
            &format!("/eth/v1/beacon/states/{}/validator_balances", state_id),
            &[("id", indexes.map(|indexes| indexes.join(",")))],
        )
    }

    pub fn get_pending_consolidations(
        &self,
        state_id: &str,
    ) -> BeaconResult<Vec<PendingConsolidation>> {
        self.fetch(
            &format!("/eth/v1/beacon/states/{}/pending_consolidations", state_id),
            &[],
        )
    }

    pub fn get_pending_deposits(&self, state_id: &str) -> BeaconResult<Vec<PendingDeposit>> {
        self.fetch(
            &format!("/eth/v1/beacon/states/{}/pending_deposits", state_id),
            &[],
        )
    }

    pub fn get_pending_partial_withdrawals(
        &self,
        state_id: &str,
    ) -> BeaconResult<Vec<PendingPartialWithdrawal>> {
        self.fetch(
            &format!(
                "/eth/v1/beacon/states/{}/pending_partial_withdrawals",
                state_id
            ),
            &[],
        )
    }

    pub fn get_genesis(&self) -> BeaconResult<Genesis> {
        self.fetch("/eth/v1/beacon/genesis", &[])
    }

    pub fn get_finality_checkpoint(&self, state_id: &str) -> BeaconResult<FinalityCheckpoints> {
        self.fetch(
            &format!("/eth/v1/beacon/states/{}/finality_checkpoints", state_id),
            &[],
        )
    }

    pub fn get_syncing(&self) -> BeaconResult<SyncStatus> {
        self.fetch("/eth/v1/node/syncing", &[])
    }

    fn fetch<D: DeserializeOwned>(&self, path: &str, query: &[QueryParam]) -> BeaconResult<D> {
        let body = self.transport.get(path, query)?;
        serde_json::from_value::<Envelope<D>>(body)
            .map(|envelope| envelope.data)
            .map_err(|e| BeaconError::Deserialisation(format!("{}: {}", path, e)))
    }
}

fn check_batch(endpoint: &'static str, requested: usize, limit: usize) -> BeaconResult<()> {
    if requested > limit {
        return Err(BeaconError::BatchTooLarge {
            endpoint,
            limit,
            requested,
        });
    }
    Ok(())
}
