use crate::errors::{RpcError, RpcResult};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-RPC methods exposed by the eth module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    BlockNumber,
    ChainId,
    GasPrice,
    MaxPriorityFeePerGas,
    GetBalance,
    GetTransactionCount,
    GetBlockByNumber,
    GetBlockByHash,
    GetTransactionByHash,
    GetTransactionReceipt,
    Call,
}

impl RpcMethod {
    pub fn name(&self) -> &'static str {
        match self {
            RpcMethod::BlockNumber => "eth_blockNumber",
            RpcMethod::ChainId => "eth_chainId",
            RpcMethod::GasPrice => "eth_gasPrice",
            RpcMethod::MaxPriorityFeePerGas => "eth_maxPriorityFeePerGas",
            RpcMethod::GetBalance => "eth_getBalance",
            RpcMethod::GetTransactionCount => "eth_getTransactionCount",
            RpcMethod::GetBlockByNumber => "eth_getBlockByNumber",
            RpcMethod::GetBlockByHash => "eth_getBlockByHash",
            RpcMethod::GetTransactionByHash => "eth_getTransactionByHash",
            RpcMethod::GetTransactionReceipt => "eth_getTransactionReceipt",
            RpcMethod::Call => "eth_call",
        }
    }

    /// Error a `null` result maps to, for lookups that can miss
    pub fn not_found(&self, params: &Value) -> Option<RpcError> {
        let subject = params
            .get(0)
            .map(|p| p.as_str().map(str::to_string).unwrap_or_else(|| p.to_string()))
            .unwrap_or_default();

        match self {
            RpcMethod::GetBlockByNumber | RpcMethod::GetBlockByHash => {
                Some(RpcError::BlockNotFound(subject))
            }
            RpcMethod::GetTransactionByHash | RpcMethod::GetTransactionReceipt => {
                Some(RpcError::TransactionNotFound(subject))
            }
            _ => None,
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hex digits in a 32-byte block hash
const BLOCK_HASH_HEX_LEN: usize = 64;

/// Block selector for state and block queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Earliest,
    Pending,
    Safe,
    Finalized,
    Number(u64),
    Hash(String),
}

impl BlockId {
    /// Encode as a JSON-RPC block parameter (tag, hex quantity or hash)
    ///
    /// A hash must be `0x` followed by 64 hex digits.
    pub fn to_param(&self) -> RpcResult<Value> {
        let param = match self {
            BlockId::Latest => Value::from("latest"),
            BlockId::Earliest => Value::from("earliest"),
            BlockId::Pending => Value::from("pending"),
            BlockId::Safe => Value::from("safe"),
            BlockId::Finalized => Value::from("finalized"),
            BlockId::Number(number) => Value::from(format!("0x{:x}", number)),
            BlockId::Hash(hash) => {
                let well_formed = hash
                    .strip_prefix("0x")
                    .map(|digits| {
                        digits.len() == BLOCK_HASH_HEX_LEN
                            && digits.chars().all(|c| c.is_ascii_hexdigit())
                    })
                    .unwrap_or(false);
                if !well_formed {
                    return Err(RpcError::InvalidArgument(format!(
                        "malformed block hash: {}",
                        hash
                    )));
                }
                Value::from(hash.clone())
            }
        };
        Ok(param)
    }

    pub fn is_hash(&self) -> bool {
        matches!(self, BlockId::Hash(_))
    }
}

impl From<u64> for BlockId {
    fn from(number: u64) -> Self {
        BlockId::Number(number)
    }
}

/// Block header fields plus raw transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    pub parent_hash: String,
    pub timestamp: String,
    pub gas_limit: String,
    pub gas_used: String,
    #[serde(default)]
    pub base_fee_per_gas: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl Block {
    pub fn number(&self) -> RpcResult<Option<u64>> {
        self.number.as_deref().map(parse_u64_quantity).transpose()
    }

    pub fn timestamp(&self) -> RpcResult<u64> {
        parse_u64_quantity(&self.timestamp)
    }

    pub fn base_fee_per_gas(&self) -> RpcResult<Option<U256>> {
        self.base_fee_per_gas
            .as_deref()
            .map(parse_quantity)
            .transpose()
    }
}

/// Parse a `0x`-prefixed hex quantity into a 256-bit integer
pub fn parse_quantity(value: &str) -> RpcResult<U256> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Deserialisation(format!("not a hex quantity: {}", value)))?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Deserialisation(format!("invalid quantity {}: {}", value, e)))
}

/// Parse a `0x`-prefixed hex quantity that must fit in a u64
pub fn parse_u64_quantity(value: &str) -> RpcResult<u64> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Deserialisation(format!("not a hex quantity: {}", value)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Deserialisation(format!("invalid quantity {}: {}", value, e)))
}

/// Decode a JSON string result as a quantity
pub(crate) fn quantity_result(value: Value) -> RpcResult<U256> {
    match value.as_str() {
        Some(s) => parse_quantity(s),
        None => Err(RpcError::Deserialisation(format!(
            "expected hex quantity, got {}",
            value
        ))),
    }
}

/// Decode a JSON string result as a u64 quantity
pub(crate) fn u64_result(value: Value) -> RpcResult<u64> {
    match value.as_str() {
        Some(s) => parse_u64_quantity(s),
        None => Err(RpcError::Deserialisation(format!(
            "expected hex quantity, got {}",
            value
        ))),
    }
}

/// Parameters for block lookups
pub(crate) fn block_params(
    block: &BlockId,
    full_transactions: bool,
) -> RpcResult<(RpcMethod, Value)> {
    let method = if block.is_hash() {
        RpcMethod::GetBlockByHash
    } else {
        RpcMethod::GetBlockByNumber
    };
    Ok((
        method,
        Value::Array(vec![block.to_param()?, Value::Bool(full_transactions)]),
    ))
}

pub(crate) fn block_result(value: Value) -> RpcResult<Block> {
    serde_json::from_value(value).map_err(|e| RpcError::Deserialisation(e.to_string()))
}

pub(crate) fn data_result(value: Value) -> RpcResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RpcError::Deserialisation(format!("expected hex data, got {}", value)))
}
