//! Execution-layer JSON-RPC integration
//!
//! - **Transport** - Blocking and async JSON-RPC over HTTP
//! - **Method** - Supported methods, block selectors and result decoding
//! - **Module** - `Eth` / `AsyncEth` with a retry-interceptable dispatch point
//! - **Fees** - EIP-1559 fee cap helper

pub mod fees;
pub mod method;
pub mod module;
pub mod transport;

// Re-export main types
pub use fees::calculate_max_tx_fees;
pub use method::{parse_quantity, parse_u64_quantity, Block, BlockId, RpcMethod};
pub use module::{AsyncEth, Dispatch, Eth};
pub use transport::{AsyncHttpTransport, AsyncJsonRpcTransport, HttpTransport, JsonRpcTransport};
