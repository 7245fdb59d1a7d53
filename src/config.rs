use crate::retry::{RetryPolicy, StopCondition};
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub beacon: BeaconConfig,
    pub eth_rpc: EthRpcConfig,
    pub retry: RetryConfig,
    pub gitlab: GitLabConfig,
}

/// Beacon node HTTP API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5052".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Execution client JSON-RPC endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthRpcConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for EthRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Retry policy settings; no limits means retry transient errors forever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub wait_seconds: u64,
    #[serde(default)]
    pub max_attempts: Option<usize>,
    #[serde(default)]
    pub max_delay_seconds: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            wait_seconds: 5,
            max_attempts: None,
            max_delay_seconds: None,
        }
    }
}

impl RetryConfig {
    /// Build the retry policy described by this configuration
    ///
    /// An attempt limit takes precedence over a delay limit.
    pub fn to_policy(&self) -> RetryPolicy {
        let stop = match (self.max_attempts, self.max_delay_seconds) {
            (Some(attempts), _) => StopCondition::AfterAttempt(attempts),
            (None, Some(seconds)) => StopCondition::AfterDelay(Duration::from_secs(seconds)),
            (None, None) => StopCondition::Never,
        };
        RetryPolicy::new(Duration::from_secs(self.wait_seconds), stop)
    }
}

/// GitLab repository holding validator public key files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub dir_path: String,
    pub branch: String,
    #[serde(default)]
    pub include_only_files: Vec<String>,
    pub tmp_dir: PathBuf,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            token: String::new(),
            project_id: None,
            dir_path: String::new(),
            branch: "master".to_string(),
            include_only_files: Vec::new(),
            tmp_dir: crate::gitlab::default_tmp_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    ///
    /// Environment keys use the `WEB3_UTILS_` prefix and `__` as the section
    /// separator, e.g. `WEB3_UTILS_BEACON__URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let beacon = BeaconConfig::default();
        let eth_rpc = EthRpcConfig::default();
        let retry = RetryConfig::default();
        let gitlab = GitLabConfig::default();

        let config = Config::builder()
            .set_default("beacon.url", beacon.url)?
            .set_default("beacon.timeout_seconds", beacon.timeout_seconds)?
            .set_default("eth_rpc.url", eth_rpc.url)?
            .set_default("eth_rpc.timeout_seconds", eth_rpc.timeout_seconds)?
            .set_default("retry.wait_seconds", retry.wait_seconds)?
            .set_default("gitlab.url", gitlab.url)?
            .set_default("gitlab.branch", gitlab.branch)?
            .set_default("gitlab.tmp_dir", gitlab.tmp_dir.to_string_lossy().to_string())?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("WEB3_UTILS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration, falling back to built-in defaults on any error
    pub fn get_defaults() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable configuration, using defaults: {}", e);
            Self {
            beacon: BeaconConfig::default(),
            eth_rpc: EthRpcConfig::default(),
            retry: RetryConfig::default(),
            gitlab: GitLabConfig::default(),
            }
        })
    }
}
