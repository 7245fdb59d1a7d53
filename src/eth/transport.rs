//! JSON-RPC transports for the execution client
//!
//! Two flavours share the same envelope handling: a blocking transport over
//! `reqwest::blocking` and an async one over `reqwest`.

use crate::errors::{RpcError, RpcResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Blocking JSON-RPC transport
pub trait JsonRpcTransport: Send + Sync {
    /// Send one request and return its `result` member
    fn send(&self, method: &str, params: &Value) -> RpcResult<Value>;
}

/// Async JSON-RPC transport
#[async_trait]
pub trait AsyncJsonRpcTransport: Send + Sync {
    /// Send one request and return its `result` member
    async fn send(&self, method: &str, params: &Value) -> RpcResult<Value>;
}

/// Build a JSON-RPC 2.0 request body
pub fn request_body(id: u64, method: &str, params: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Extract `result` from a JSON-RPC response, surfacing `error` objects
pub fn decode_response(body: Value) -> RpcResult<Value> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Err(RpcError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    match body {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| RpcError::Deserialisation("response has no result".to_string())),
        other => Err(RpcError::Deserialisation(format!(
            "unexpected response: {}",
            other
        ))),
    }
}

/// Blocking HTTP transport; the client is built on first use
pub struct HttpTransport {
    url: String,
    timeout: Duration,
    next_id: AtomicU64,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            next_id: AtomicU64::new(1),
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> RpcResult<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RpcError::Connection(format!("Failed to create RPC client: {}", e)))?;
        let _ = self.client.set(client);
        self.client
            .get()
            .ok_or_else(|| RpcError::Connection("RPC client unavailable".to_string()))
    }
}

fn map_blocking_error(err: reqwest::Error) -> RpcError {
    if err.is_timeout() {
        RpcError::Timeout(err.to_string())
    } else if err.is_decode() {
        RpcError::Deserialisation(err.to_string())
    } else {
        RpcError::Connection(err.to_string())
    }
}

impl JsonRpcTransport for HttpTransport {
    fn send(&self, method: &str, params: &Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("RPC request {} {}", id, method);

        let response = self
            .client()?
            .post(&self.url)
            .json(&request_body(id, method, params))
            .send()
            .map_err(map_blocking_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        decode_response(response.json::<Value>().map_err(map_blocking_error)?)
    }
}

/// Async HTTP transport
pub struct AsyncHttpTransport {
    url: String,
    next_id: AtomicU64,
    client: reqwest::Client,
}

impl AsyncHttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> RpcResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Connection(format!("Failed to create RPC client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            next_id: AtomicU64::new(1),
            client,
        })
    }
}

fn map_async_error(err: reqwest::Error) -> RpcError {
    if err.is_timeout() {
        RpcError::Timeout(err.to_string())
    } else if err.is_connect() {
        RpcError::ConnectorConnection(err.to_string())
    } else if err.is_decode() {
        RpcError::Deserialisation(err.to_string())
    } else {
        RpcError::Connection(err.to_string())
    }
}

#[async_trait]
impl AsyncJsonRpcTransport for AsyncHttpTransport {
    async fn send(&self, method: &str, params: &Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("RPC request {} {}", id, method);

        let response = self
            .client
            .post(&self.url)
            .json(&request_body(id, method, params))
            .send()
            .await
            .map_err(map_async_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        decode_response(response.json::<Value>().await.map_err(map_async_error)?)
    }
}
