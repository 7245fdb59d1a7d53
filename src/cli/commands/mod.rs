pub mod beacon;
pub mod eth;
pub mod gitlab;
pub mod utils;

use crate::config::RetryConfig;
use clap::Args;

/// Retry overrides shared by the networked commands
#[derive(Args, Debug, Clone, Default)]
pub struct RetryArgs {
    /// Give up after this many attempts (default: retry transient errors forever)
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Seconds to wait between attempts (overrides config.toml)
    #[arg(long)]
    pub wait_seconds: Option<u64>,
}

impl RetryArgs {
    pub fn apply(&self, config: &mut RetryConfig) {
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = Some(attempts);
        }
        if let Some(seconds) = self.wait_seconds {
            config.wait_seconds = seconds;
        }
    }
}
