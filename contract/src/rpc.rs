//! JSON-RPC 2.0 client for an Ethereum-compatible node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::abi;
use crate::error::ContractError;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC error code for a user-rejected request (EIP-1193).
const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code geth uses for reverted calls.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// HTTP client for a node's JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and a request id counter.
#[derive(Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    /// Create a client for `url` (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ContractError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ContractError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and deserialize its `result` field.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ContractError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, "json-rpc request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ContractError::Transport(format!("{method} timed out: {e}"))
                } else {
                    ContractError::Transport(format!("{method} failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(ContractError::Http(response.status().as_u16()));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ContractError::Decode(format!("{method}: invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            return Err(classify_error(err));
        }

        let result = json
            .get("result")
            .cloned()
            .ok_or_else(|| ContractError::Decode(format!("{method}: response has no result")))?;
        serde_json::from_value(result)
            .map_err(|e| ContractError::Decode(format!("{method}: unexpected result: {e}")))
    }
}

/// Map a JSON-RPC error object onto a [`ContractError`] kind.
pub fn classify_error(err: &Value) -> ContractError {
    let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();

    if code == USER_REJECTED_CODE {
        return ContractError::Rejected(message);
    }

    if code == EXECUTION_REVERTED_CODE || message.contains("execution reverted") {
        let reason = err
            .get("data")
            .and_then(Value::as_str)
            .and_then(|data| abi::from_hex(data).ok())
            .and_then(|bytes| abi::decode_revert_reason(&bytes));
        return ContractError::Reverted(reason.unwrap_or(message));
    }

    ContractError::Rpc { code, message }
}
