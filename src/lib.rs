//! json-rpc-scan
//!
//! Differential testing between two JSON-RPC execution-client endpoints.
//! Issues the same requests against both, structurally diffs the responses,
//! and persists every divergence for inspection.
//!
//! This crate provides the core implementation for the `json-rpc-scan`
//! CLI tool.

pub mod compat;
pub mod diff;
pub mod rpc;
pub mod runners;
pub mod utils;

pub use compat::{detect_client_type, ClientInfo, ClientType, CompatOverrides};
pub use diff::{DiffComputer, DiffReporter, DiffType, Difference};
pub use rpc::{Endpoint, RpcClient, RpcResponse};
pub use runners::{TraceConfig, BUILTIN_TRACERS};
pub use utils::Config;
