use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Beacon-chain HTTP operations
    #[error("Beacon error: {0}")]
    Beacon(#[from] BeaconError),

    /// Execution-layer JSON-RPC operations
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// GitLab repository downloads
    #[error("GitLab error: {0}")]
    GitLab(#[from] GitLabError),

    /// Address parsing and checksumming
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Unit conversion
    #[error(transparent)]
    Units(#[from] UnitsError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Beacon-chain HTTP API errors
#[derive(Error, Debug)]
pub enum BeaconError {
    /// Could not reach the beacon node (refused, reset, DNS)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Beacon node answered with a non-success status
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// Request exceeded the configured client timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response body did not match the expected `{"data": ...}` shape
    #[error("Deserialisation failed: {0}")]
    Deserialisation(String),

    /// Batch query exceeded the endpoint limit; raised before any I/O
    #[error("Too many ids for {endpoint}: {requested} requested, limit is {limit}")]
    BatchTooLarge {
        endpoint: &'static str,
        limit: usize,
        requested: usize,
    },

    /// Blocking worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl BeaconError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            BeaconError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Execution-layer JSON-RPC errors
#[derive(Error, Debug)]
pub enum RpcError {
    /// Block lookup returned null
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// Transaction or receipt lookup returned null
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Blocking transport could not connect
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Async transport connector could not establish a connection
    #[error("Connector error: {0}")]
    ConnectorConnection(String),

    /// Async operation timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Node answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON-RPC error object returned by the node
    #[error("RPC call failed ({code}): {message}")]
    Rpc { code: i64, message: String },

    /// Response did not decode into the expected type
    #[error("Deserialisation failed: {0}")]
    Deserialisation(String),

    /// Caller supplied an argument the module cannot encode
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Address validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),
}

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid decimal amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflows 256 bits: {0}")]
    Overflow(String),
}

/// GitLab downloader errors
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("GitLab request failed: {0}")]
    Request(String),

    #[error("GitLab returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Blob {id} is not valid UTF-8")]
    Utf8 { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for beacon-chain operations
pub type BeaconResult<T> = Result<T, BeaconError>;

/// Result type for JSON-RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Result type for GitLab operations
pub type GitLabResult<T> = Result<T, GitLabError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for GitLabError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => GitLabError::Http {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => GitLabError::Request(err.to_string()),
        }
    }
}
