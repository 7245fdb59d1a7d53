use super::RetryArgs;
use crate::beacon::{AsyncBeacon, HttpBeaconTransport, DEFAULT_STATE_ID};
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::utils::time::compute_time_at_slot;
use clap::Args;
use tracing::info;

/// Beacon node connection options
#[derive(Args)]
pub struct BeaconArgs {
    /// Beacon node URL (overrides config.toml)
    #[arg(long)]
    pub beacon_url: Option<String>,

    #[command(flatten)]
    pub retry: RetryArgs,
}

impl BeaconArgs {
    fn connect(&self) -> AppResult<AsyncBeacon<HttpBeaconTransport>> {
        let mut app_config = AppConfig::get_defaults();
        if let Some(url) = &self.beacon_url {
            app_config.beacon.url = url.clone();
        }
        self.retry.apply(&mut app_config.retry);

        info!("Using beacon node at: {}", app_config.beacon.url);
        Ok(AsyncBeacon::connect(
            &app_config.beacon,
            app_config.retry.to_policy(),
        ))
    }
}

/// Print the beacon chain genesis time
#[derive(Args)]
pub struct GenesisCommand {
    /// Also print the start time of this slot
    #[arg(long)]
    pub slot: Option<u64>,

    #[command(flatten)]
    pub beacon: BeaconArgs,
}

impl GenesisCommand {
    pub async fn run(&self) -> AppResult<()> {
        let beacon = self.beacon.connect()?;
        let genesis_time = beacon.get_genesis().await?;

        println!("Genesis time: {}", genesis_time);
        if let Some(slot) = self.slot {
            match compute_time_at_slot(genesis_time, slot) {
                Some(time) => println!("Slot {} starts at: {}", slot, time),
                None => println!("Slot {} is past the representable time range", slot),
            }
        }
        Ok(())
    }
}

/// Look up a validator by public key or index
#[derive(Args)]
pub struct ValidatorCommand {
    /// Validator public key (0x-prefixed) or index
    pub pubkey: String,

    /// State to query: head, finalized, justified, genesis, a slot or a state root
    #[arg(long, default_value = DEFAULT_STATE_ID)]
    pub state_id: String,

    #[command(flatten)]
    pub beacon: BeaconArgs,
}

impl ValidatorCommand {
    pub async fn run(&self) -> AppResult<()> {
        let beacon = self.beacon.connect()?;

        match beacon.get_validator(&self.pubkey, &self.state_id).await? {
            Some(validator) => println!("{}", serde_json::to_string_pretty(&validator)?),
            None => println!("Validator {} not found at state {}", self.pubkey, self.state_id),
        }
        Ok(())
    }
}

/// Print the beacon node sync status
#[derive(Args)]
pub struct SyncingCommand {
    #[command(flatten)]
    pub beacon: BeaconArgs,
}

impl SyncingCommand {
    pub async fn run(&self) -> AppResult<()> {
        let beacon = self.beacon.connect()?;
        let status = beacon.get_syncing().await?;

        println!("Head slot:     {}", status.head_slot);
        println!("Sync distance: {}", status.sync_distance);
        println!("Syncing:       {}", status.is_syncing);
        if let Some(optimistic) = status.is_optimistic {
            println!("Optimistic:    {}", optimistic);
        }
        if let Some(el_offline) = status.el_offline {
            println!("EL offline:    {}", el_offline);
        }
        Ok(())
    }
}
