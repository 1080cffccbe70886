//! HTTP client issuing single and paired JSON-RPC calls.
//!
//! The client never surfaces transport or HTTP failures to the caller:
//! every call resolves to an [`RpcResponse`], with failures captured in its
//! `error` field. The underlying session is owned by the client and released
//! on drop, on every exit path.

use super::types::{Endpoint, JsonRpcRequest, RpcResponse};
use crate::utils::error::RpcError;
use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Dual-endpoint JSON-RPC client
///
/// A single blocking HTTP client shared by both endpoints; the connection
/// pool supports concurrent outstanding requests, which `call_both` relies
/// on.
pub struct RpcClient {
    client: Client,
}

impl RpcClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `timeout` - per-request timeout applied to every call
    /// * `max_connections` - connection pool bound per endpoint host
    pub fn new(timeout: Duration, max_connections: usize) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_connections)
            .build()
            .map_err(RpcError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Issue a single JSON-RPC call
    ///
    /// Endpoint headers are merged over the client defaults. HTTP status
    /// failures produce `error = "HTTP <status>: <body>"`; transport
    /// failures (refused connection, timeout, resolution) produce the
    /// underlying description. No retries: a single failure is terminal for
    /// that call.
    pub fn call(&self, endpoint: &Endpoint, method: &str, params: Value, id: u64) -> RpcResponse {
        let request = JsonRpcRequest::new(method, params, id);
        let request_value = request.to_value();

        debug!("[{}] {} -> {}", endpoint.name, method, endpoint.url);

        let mut builder = self.client.post(&endpoint.url).json(&request);
        if let Some(headers) = &endpoint.headers {
            for (key, value) in headers {
                builder = builder.header(key, value);
            }
        }

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                warn!("[{}] {} transport failure: {}", endpoint.name, method, e);
                return RpcResponse::failed(endpoint.clone(), request_value, e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("[{}] {} returned HTTP {}", endpoint.name, method, status);
            return RpcResponse::failed(
                endpoint.clone(),
                request_value,
                format!("HTTP {}: {}", status.as_u16(), body),
            );
        }

        match response.json::<Value>() {
            Ok(body) => RpcResponse::completed(endpoint.clone(), request_value, body),
            Err(e) => RpcResponse::failed(
                endpoint.clone(),
                request_value,
                format!("Invalid JSON response: {}", e),
            ),
        }
    }

    /// Issue the same call against both endpoints concurrently
    ///
    /// A fixed two-thread fork-join: wall-clock cost is bounded by the
    /// slower leg, not their sum. The returned tuple order matches the
    /// input endpoint order regardless of completion order.
    pub fn call_both(
        &self,
        endpoint1: &Endpoint,
        endpoint2: &Endpoint,
        method: &str,
        params: Value,
        id: u64,
    ) -> (RpcResponse, RpcResponse) {
        let params2 = params.clone();

        thread::scope(|scope| {
            let handle1 = scope.spawn(|| self.call(endpoint1, method, params, id));
            let handle2 = scope.spawn(|| self.call(endpoint2, method, params2, id));

            (
                join_leg(handle1, endpoint1, method, id),
                join_leg(handle2, endpoint2, method, id),
            )
        })
    }

    /// Current head block number, or `None` if the call failed or the
    /// result is absent/malformed
    pub fn get_block_number(&self, endpoint: &Endpoint) -> Option<u64> {
        let response = self.call(endpoint, "eth_blockNumber", serde_json::json!([]), 1);
        parse_hex_quantity(response.result()?)
    }

    /// Fetch a block by number via `eth_getBlockByNumber`
    pub fn get_block(
        &self,
        endpoint: &Endpoint,
        number: u64,
        full_transactions: bool,
    ) -> Option<Value> {
        let params = serde_json::json!([format!("0x{:x}", number), full_transactions]);
        let response = self.call(endpoint, "eth_getBlockByNumber", params, 1);
        non_null(response.result()?)
    }

    /// Fetch a transaction receipt via `eth_getTransactionReceipt`
    pub fn get_transaction_receipt(&self, endpoint: &Endpoint, tx_hash: &str) -> Option<Value> {
        let params = serde_json::json!([tx_hash]);
        let response = self.call(endpoint, "eth_getTransactionReceipt", params, 1);
        non_null(response.result()?)
    }

    /// The endpoint's `web3_clientVersion` string, if it answers
    pub fn client_version(&self, endpoint: &Endpoint) -> Option<String> {
        let response = self.call(endpoint, "web3_clientVersion", serde_json::json!([]), 1);
        response.result()?.as_str().map(str::to_string)
    }
}

/// Resolve one leg of a paired call, mapping a panicked worker to a failed
/// response rather than tearing down the sweep.
fn join_leg(
    handle: thread::ScopedJoinHandle<'_, RpcResponse>,
    endpoint: &Endpoint,
    method: &str,
    id: u64,
) -> RpcResponse {
    match handle.join() {
        Ok(response) => response,
        Err(_) => RpcResponse::failed(
            endpoint.clone(),
            JsonRpcRequest::new(method, serde_json::json!([]), id).to_value(),
            "request worker panicked",
        ),
    }
}

/// Decode a `0x`-prefixed hex quantity
fn parse_hex_quantity(value: &Value) -> Option<u64> {
    let text = value.as_str()?;
    let digits = text.strip_prefix("0x")?;
    u64::from_str_radix(digits, 16).ok()
}

/// Treat a JSON `null` result as absent
fn non_null(value: &Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value.clone())
    }
}
