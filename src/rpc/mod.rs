//! JSON-RPC transport layer: endpoints, request envelopes, and the
//! dual-endpoint client.

pub mod client;
pub mod types;

pub use client::RpcClient;
pub use types::{Endpoint, JsonRpcRequest, RpcResponse};
