use crate::beacon::client::Beacon;
use crate::beacon::transport::{BeaconTransport, HttpBeaconTransport};
use crate::beacon::types::{
    FinalityCheckpoints, PendingConsolidation, PendingDeposit, PendingPartialWithdrawal,
    SyncStatus, ValidatorBalance, ValidatorData,
};
use crate::config::BeaconConfig;
use crate::errors::{BeaconError, BeaconResult};
use crate::retry::{is_retryable_beacon_error, CallSite, RetryPolicy};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Retry-wrapped beacon client that never blocks the async runtime
///
/// Each query runs the blocking [`Beacon`] call on tokio's blocking pool and
/// awaits it, retrying transient failures per the configured policy.
pub struct AsyncBeacon<T> {
    beacon: Arc<Beacon<T>>,
    policy: RetryPolicy,
    genesis_time: OnceCell<u64>,
}

impl AsyncBeacon<HttpBeaconTransport> {
    /// Create an adapter talking HTTP to the configured beacon node
    pub fn connect(config: &BeaconConfig, policy: RetryPolicy) -> Self {
        let transport =
            HttpBeaconTransport::new(&config.url, Duration::from_secs(config.timeout_seconds));
        Self::new(Beacon::new(transport), policy)
    }
}

impl<T: BeaconTransport + 'static> AsyncBeacon<T> {
    pub fn new(beacon: Beacon<T>, policy: RetryPolicy) -> Self {
        Self {
            beacon: Arc::new(beacon),
            policy,
            genesis_time: OnceCell::new(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn get_syncing(&self) -> BeaconResult<SyncStatus> {
        self.run_as_async("get_syncing", (), |beacon| beacon.get_syncing())
            .await
    }

    pub async fn get_finality_checkpoint(&self, state_id: &str) -> BeaconResult<FinalityCheckpoints> {
        let state_id = state_id.to_string();
        self.run_as_async("get_finality_checkpoint", (state_id.clone(),), move |beacon| {
            beacon.get_finality_checkpoint(&state_id)
        })
        .await
    }

    /// Genesis time in seconds, fetched once per adapter
    ///
    /// Concurrent first callers share a single in-flight fetch.
    pub async fn get_genesis(&self) -> BeaconResult<u64> {
        let genesis_time = self
            .genesis_time
            .get_or_try_init(|| async {
                let genesis = self
                    .run_as_async("get_genesis", (), |beacon| beacon.get_genesis())
                    .await?;
                debug!("Cached genesis time {}", genesis.genesis_time);
                Ok::<u64, BeaconError>(genesis.genesis_time)
            })
            .await?;
        Ok(*genesis_time)
    }

    /// Single validator lookup; `Ok(None)` when the node does not know it yet
    pub async fn get_validator(
        &self,
        pubkey: &str,
        state_id: &str,
    ) -> BeaconResult<Option<ValidatorData>> {
        let pubkey = pubkey.to_string();
        let state_id = state_id.to_string();
        self.run_as_async(
            "get_validator",
            (pubkey.clone(), state_id.clone()),
            move |beacon| match beacon.get_validator(&pubkey, &state_id) {
                Ok(validator) => Ok(Some(validator)),
                Err(e) if e.status() == Some(404) => {
                    info!(
                        "BEACON CHAIN: Validator {} was not found, probably is not active yet | State: {}",
                        pubkey, state_id
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        )
        .await
    }

    pub async fn get_validators(
        &self,
        state_id: &str,
        ids: Option<Vec<String>>,
        statuses: Option<Vec<String>>,
    ) -> BeaconResult<Vec<ValidatorData>> {
        let state_id = state_id.to_string();
        self.run_as_async(
            "get_validators",
            (state_id.clone(), ids.clone(), statuses.clone()),
            move |beacon| beacon.get_validators(&state_id, ids.as_deref(), statuses.as_deref()),
        )
        .await
    }

    pub async fn get_validator_balances(
        &self,
        state_id: &str,
        indexes: Option<Vec<String>>,
    ) -> BeaconResult<Vec<ValidatorBalance>> {
        let state_id = state_id.to_string();
        self.run_as_async(
            "get_validator_balances",
            (state_id.clone(), indexes.clone()),
            move |beacon| beacon.get_validator_balances(&state_id, indexes.as_deref()),
        )
        .await
    }

    pub async fn get_pending_consolidations(
        &self,
        state_id: &str,
    ) -> BeaconResult<Vec<PendingConsolidation>> {
        let state_id = state_id.to_string();
        self.run_as_async("get_pending_consolidations", (state_id.clone(),), move |beacon| {
            beacon.get_pending_consolidations(&state_id)
        })
        .await
    }

    pub async fn get_pending_deposits(&self, state_id: &str) -> BeaconResult<Vec<PendingDeposit>> {
        let state_id = state_id.to_string();
        self.run_as_async("get_pending_deposits", (state_id.clone(),), move |beacon| {
            beacon.get_pending_deposits(&state_id)
        })
        .await
    }

    pub async fn get_pending_partial_withdrawals(
        &self,
        state_id: &str,
    ) -> BeaconResult<Vec<PendingPartialWithdrawal>> {
        let state_id = state_id.to_string();
        self.run_as_async(
            "get_pending_partial_withdrawals",
            (state_id.clone(),),
            move |beacon| beacon.get_pending_partial_withdrawals(&state_id),
        )
        .await
    }

    /// Run a blocking beacon call on the blocking pool, under the retry policy
    async fn run_as_async<R, F>(&self, name: &str, args: impl Debug, call: F) -> BeaconResult<R>
    where
        R: Debug + Send + 'static,
        F: Fn(&Beacon<T>) -> BeaconResult<R> + Send + Sync + 'static,
    {
        let call = Arc::new(call);
        let site = CallSite::new(name, args);

        self.policy
            .execute(&site, is_retryable_beacon_error, || {
                let beacon = Arc::clone(&self.beacon);
                let call = Arc::clone(&call);
                async move {
                    match tokio::task::spawn_blocking(move || (*call)(beacon.as_ref())).await {
                        Ok(result) => result,
                        Err(e) => Err(BeaconError::Worker(e.to_string())),
                    }
                }
            })
            .await
    }
}
