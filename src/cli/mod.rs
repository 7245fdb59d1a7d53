use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Ethereum beacon-chain and JSON-RPC diagnostics
#[derive(Parser)]
#[command(name = "web3-utils")]
#[command(about = "Ethereum beacon-chain and JSON-RPC diagnostics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the beacon chain genesis time
    Genesis(commands::beacon::GenesisCommand),
    /// Look up a validator by public key or index
    Validator(commands::beacon::ValidatorCommand),
    /// Print the beacon node sync status
    Syncing(commands::beacon::SyncingCommand),
    /// Print the latest execution block number
    BlockNumber(commands::eth::BlockNumberCommand),
    /// Print EIP-1559 fee caps derived from the latest block
    MaxFees(commands::eth::MaxFeesCommand),
    /// Print the EIP-55 checksum form of an address
    Checksum(commands::utils::ChecksumCommand),
    /// Convert a gwei amount to wei
    GweiToWei(commands::utils::GweiToWeiCommand),
    /// Download validator public key files from a GitLab project
    DownloadKeys(commands::gitlab::DownloadKeysCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "info" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Genesis(command) => command.run().await,
        Commands::Validator(command) => command.run().await,
        Commands::Syncing(command) => command.run().await,
        Commands::BlockNumber(command) => command.run().await,
        Commands::MaxFees(command) => command.run().await,
        Commands::Checksum(command) => command.run(),
        Commands::GweiToWei(command) => command.run(),
        Commands::DownloadKeys(command) => command.run().await,
    }
}
