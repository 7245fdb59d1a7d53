//! Blocking HTTP access to a beacon node
//!
//! The transport is synchronous. The async adapter moves every
//! call onto tokio's blocking pool, so the HTTP client is created lazily on
//! the first request, inside that pool.

use crate::errors::{BeaconError, BeaconResult};
use reqwest::Url;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// A query parameter passed verbatim to the beacon node. `None` is kept as a
/// bare key rather than being dropped.
pub type QueryParam = (&'static str, Option<String>);

/// Blocking GET against a beacon node, returning the decoded JSON body
pub trait BeaconTransport: Send + Sync {
    fn get(&self, path: &str, query: &[QueryParam]) -> BeaconResult<Value>;
}

/// `reqwest::blocking` implementation of [`BeaconTransport`]
pub struct HttpBeaconTransport {
    base_url: String,
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpBeaconTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client: OnceLock::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self) -> BeaconResult<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                BeaconError::Connection(format!("Failed to create beacon HTTP client: {}", e))
            })?;
        // Losing a first-request race drops the extra client
        let _ = self.client.set(client);
        self.client
            .get()
            .ok_or_else(|| BeaconError::Connection("Beacon HTTP client unavailable".to_string()))
    }
}

/// Build the request URL, keeping `None`-valued parameters as bare keys
pub fn build_url(base_url: &str, path: &str, query: &[QueryParam]) -> BeaconResult<Url> {
    let mut url = Url::parse(&format!("{}{}", base_url, path))
        .map_err(|e| BeaconError::Connection(format!("Invalid beacon URL: {}", e)))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            match value {
                Some(value) => pairs.append_pair(key, value),
                None => pairs.append_key_only(key),
            };
        }
    }

    Ok(url)
}

fn map_send_error(err: reqwest::Error) -> BeaconError {
    if err.is_timeout() {
        BeaconError::Timeout(err.to_string())
    } else if err.is_decode() {
        BeaconError::Deserialisation(err.to_string())
    } else {
        BeaconError::Connection(err.to_string())
    }
}

impl BeaconTransport for HttpBeaconTransport {
    fn get(&self, path: &str, query: &[QueryParam]) -> BeaconResult<Value> {
        let url = build_url(&self.base_url, path, query)?;
        debug!("GET {}", url);

        let response = self
            .client()?
            .get(url.clone())
            .send()
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(BeaconError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        response.json::<Value>().map_err(map_send_error)
    }
}
