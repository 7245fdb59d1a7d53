//! Common Test Utilities
//!
//! Fake transports and JSON fixtures shared by the unit and integration
//! targets. Nothing here talks to a real node.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use web3_utils::beacon::{BeaconTransport, QueryParam};
use web3_utils::errors::{BeaconError, BeaconResult, RpcError, RpcResult};
use web3_utils::eth::{AsyncJsonRpcTransport, JsonRpcTransport};
use web3_utils::retry::{RetryPolicy, StopCondition};

pub const VALIDATOR_PUBKEY: &str = "0x93247f2209abcacf57b75a51dafae777f9dd38bc7053d1af526f220a7489a6d3a2753e5f3e8b1cfe39b56f43611df74a";

/// Retry policy with a 1ms wait so retry tests finish quickly
pub fn fast_policy(stop: StopCondition) -> RetryPolicy {
    RetryPolicy::new(Duration::from_millis(1), stop)
}

/// A beacon GET as seen by the fake transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconCall {
    pub path: String,
    pub query: Vec<(String, Option<String>)>,
}

impl BeaconCall {
    pub fn new(path: &str, query: &[(&str, Option<&str>)]) -> Self {
        Self {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
                .collect(),
        }
    }
}

#[derive(Default)]
struct BeaconScript {
    responses: VecDeque<BeaconResult<Value>>,
    fallback: Option<Value>,
    calls: Vec<BeaconCall>,
}

/// Beacon transport answering from a script, then from an optional fallback
///
/// Clones share state, so a test can keep a handle after moving the
/// transport into a client.
#[derive(Clone, Default)]
pub struct FakeBeaconTransport {
    script: Arc<Mutex<BeaconScript>>,
}

impl FakeBeaconTransport {
    pub fn scripted(responses: Vec<BeaconResult<Value>>) -> Self {
        let transport = Self::default();
        transport.script.lock().unwrap().responses = responses.into();
        transport
    }

    /// Every call answers with `body`
    pub fn always(body: Value) -> Self {
        let transport = Self::default();
        transport.script.lock().unwrap().fallback = Some(body);
        transport
    }

    pub fn calls(&self) -> Vec<BeaconCall> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }
}

impl BeaconTransport for FakeBeaconTransport {
    fn get(&self, path: &str, query: &[QueryParam]) -> BeaconResult<Value> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(BeaconCall {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        });

        if let Some(response) = script.responses.pop_front() {
            return response;
        }
        script
            .fallback
            .clone()
            .ok_or_else(|| BeaconError::Connection("no scripted response left".to_string()))
    }
}

pub fn http_error(status: u16) -> BeaconError {
    BeaconError::Http {
        status,
        url: "http://beacon.test".to_string(),
        message: format!("status {}", status),
    }
}

pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}

pub fn genesis_json(genesis_time: u64) -> Value {
    envelope(json!({
        "genesis_time": genesis_time.to_string(),
        "genesis_validators_root": "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95",
        "genesis_fork_version": "0x00000000"
    }))
}

pub fn validator_json(index: u64, pubkey: &str) -> Value {
    json!({
        "index": index.to_string(),
        "balance": "32000130042",
        "status": "active_ongoing",
        "validator": {
            "pubkey": pubkey,
            "withdrawal_credentials": "0x010000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f",
            "effective_balance": "32000000000",
            "slashed": false,
            "activation_eligibility_epoch": "0",
            "activation_epoch": "0",
            "exit_epoch": "18446744073709551615",
            "withdrawable_epoch": "18446744073709551615"
        }
    })
}

pub fn syncing_json(head_slot: u64, is_syncing: bool) -> Value {
    envelope(json!({
        "head_slot": head_slot.to_string(),
        "sync_distance": "0",
        "is_syncing": is_syncing,
        "is_optimistic": false,
        "el_offline": false
    }))
}

#[derive(Default)]
struct RpcScript {
    responses: VecDeque<RpcResult<Value>>,
    methods: Vec<String>,
}

/// JSON-RPC transport answering from a script, usable blocking or async
#[derive(Clone, Default)]
pub struct FakeRpcTransport {
    script: Arc<Mutex<RpcScript>>,
}

impl FakeRpcTransport {
    pub fn scripted(responses: Vec<RpcResult<Value>>) -> Self {
        let transport = Self::default();
        transport.script.lock().unwrap().responses = responses.into();
        transport
    }

    pub fn methods(&self) -> Vec<String> {
        self.script.lock().unwrap().methods.clone()
    }

    fn next(&self, method: &str) -> RpcResult<Value> {
        let mut script = self.script.lock().unwrap();
        script.methods.push(method.to_string());
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::Connection("no scripted response left".to_string())))
    }
}

impl JsonRpcTransport for FakeRpcTransport {
    fn send(&self, method: &str, _params: &Value) -> RpcResult<Value> {
        self.next(method)
    }
}

#[async_trait]
impl AsyncJsonRpcTransport for FakeRpcTransport {
    async fn send(&self, method: &str, _params: &Value) -> RpcResult<Value> {
        self.next(method)
    }
}

pub fn block_json(number: u64, base_fee_per_gas: u64) -> Value {
    json!({
        "number": format!("{:#x}", number),
        "hash": format!("0x{:064x}", number),
        "parentHash": format!("0x{:064x}", number.saturating_sub(1)),
        "timestamp": "0x6553f100",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "baseFeePerGas": format!("{:#x}", base_fee_per_gas),
        "transactions": []
    })
}
