use super::RetryArgs;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::eth::{calculate_max_tx_fees, AsyncEth, AsyncHttpTransport};
use crate::utils::units::convert_to_standard_notation;
use clap::Args;
use std::time::Duration;
use tracing::info;

/// Execution client connection options
#[derive(Args)]
pub struct RpcArgs {
    /// Execution client JSON-RPC URL (overrides config.toml)
    #[arg(long)]
    pub rpc_url: Option<String>,

    #[command(flatten)]
    pub retry: RetryArgs,
}

impl RpcArgs {
    fn connect(&self) -> AppResult<AsyncEth<AsyncHttpTransport>> {
        let mut app_config = AppConfig::get_defaults();
        if let Some(url) = &self.rpc_url {
            app_config.eth_rpc.url = url.clone();
        }
        self.retry.apply(&mut app_config.retry);

        info!("Using execution client at: {}", app_config.eth_rpc.url);
        let transport = AsyncHttpTransport::new(
            app_config.eth_rpc.url.clone(),
            Duration::from_secs(app_config.eth_rpc.timeout_seconds),
        )?;
        Ok(AsyncEth::retryable(transport, app_config.retry.to_policy()))
    }
}

/// Print the latest execution block number
#[derive(Args)]
pub struct BlockNumberCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl BlockNumberCommand {
    pub async fn run(&self) -> AppResult<()> {
        let eth = self.rpc.connect()?;
        println!("Block number: {}", eth.block_number().await?);
        Ok(())
    }
}

/// Print EIP-1559 fee caps derived from the latest block
#[derive(Args)]
pub struct MaxFeesCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl MaxFeesCommand {
    pub async fn run(&self) -> AppResult<()> {
        let eth = self.rpc.connect()?;
        let (max_fee, priority_fee) = calculate_max_tx_fees(&eth).await?;

        println!("Max fee per gas:          {} wei", convert_to_standard_notation(&max_fee));
        println!("Max priority fee per gas: {} wei", convert_to_standard_notation(&priority_fee));
        Ok(())
    }
}
