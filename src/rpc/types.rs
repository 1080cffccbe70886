//! Types for JSON-RPC 2.0 communication with execution-client endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One endpoint under comparison
///
/// Immutable once created from configuration. Optional headers are merged
/// over the client defaults on every request (static pass-through only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Display name used in logs and report files
    pub name: String,

    /// HTTP(S) URL of the JSON-RPC endpoint
    pub url: String,

    /// Extra request headers (e.g. Authorization)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            headers: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    /// Build a request envelope
    ///
    /// `params` should be a JSON array per the JSON-RPC 2.0 spec.
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// The envelope as a JSON value (for logging and report files)
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "jsonrpc": self.jsonrpc,
            "method": self.method,
            "params": self.params,
            "id": self.id,
        })
    }
}

/// Outcome of a single JSON-RPC call against one endpoint
///
/// Transport and HTTP failures are captured in `error` rather than
/// propagated, so one failing endpoint never aborts a comparison sweep.
/// Invariant: when `error` is set, `response` is the empty object.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    /// The endpoint this call was issued against
    pub endpoint: Endpoint,

    /// The request envelope that was sent
    pub request: Value,

    /// Parsed JSON-RPC response body; `{}` on failure
    pub response: Value,

    /// Transport or HTTP failure description, if the call did not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Completed call with a parsed body
    pub fn completed(endpoint: Endpoint, request: Value, response: Value) -> Self {
        Self {
            endpoint,
            request,
            response,
            error: None,
        }
    }

    /// Failed call: the body is replaced by the empty object
    pub fn failed(endpoint: Endpoint, request: Value, error: impl Into<String>) -> Self {
        Self {
            endpoint,
            request,
            response: serde_json::json!({}),
            error: Some(error.into()),
        }
    }

    /// The JSON-RPC `result` field, if the call completed with one
    pub fn result(&self) -> Option<&Value> {
        self.response.get("result")
    }

    /// Whether this call failed at the transport/HTTP layer
    pub fn is_transport_error(&self) -> bool {
        self.error.is_some()
    }
}
