//! The comparison sweep.
//!
//! Drives the full pipeline: detect both clients, filter the candidate
//! method/tracer set, issue a paired call per accepted item, and persist
//! every non-empty diff. A failing endpoint surfaces as error-vs-success
//! differences; it never aborts the sweep.

use crate::compat::{detect_client_type, filter_methods, filter_tracers, tracer_name, ClientInfo};
use crate::diff::DiffReporter;
use crate::rpc::{Endpoint, RpcClient, RpcResponse};
use crate::runners::debug::{TraceConfig, BUILTIN_TRACERS};
use crate::utils::config::Config;
use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for a comparison sweep
#[derive(Debug, Clone)]
pub struct ScanArgs {
    /// Endpoints, timeout, concurrency, and overrides
    pub config: Config,

    /// Directory diff reports are written under
    pub output_dir: PathBuf,

    /// Explicit target block; defaults to the lower of both heads
    pub block: Option<u64>,

    /// How many consecutive blocks to sweep, ending at the target
    pub block_count: u64,

    /// Candidate methods, filtered through the compatibility matrix
    pub methods: Vec<String>,

    /// Base trace options applied to every debug-trace call
    pub trace_config: TraceConfig,

    /// Max transactions sampled per block for per-transaction methods
    pub tx_limit: usize,
}

/// Outcome counters for a completed sweep
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Paired calls issued
    pub calls: usize,

    /// Total differences found across all comparisons
    pub diffs_found: usize,

    /// Methods rejected by the compatibility filter
    pub methods_skipped: Vec<String>,

    /// Tracers rejected by the compatibility filter (display names)
    pub tracers_skipped: Vec<String>,
}

/// The default candidate method set
pub fn default_methods() -> Vec<String> {
    [
        "eth_getBlockByNumber",
        "eth_getBlockReceipts",
        "debug_traceBlockByNumber",
        "debug_traceTransaction",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

/// Run a comparison sweep
pub fn run_scan(args: ScanArgs) -> Result<ScanSummary> {
    let (endpoint1, endpoint2) = args.config.endpoint_pair();
    let client = RpcClient::new(
        Duration::from_secs_f64(args.config.timeout),
        args.config.max_concurrent,
    )
    .context("Failed to create RPC client")?;

    info!("Step 1/4: Detecting client implementations...");
    let info1 = detect_endpoint(&client, endpoint1);
    let info2 = detect_endpoint(&client, endpoint2);

    info!("Step 2/4: Filtering methods and tracers...");
    let overrides = Some(&args.config.compat_overrides);
    let (methods, methods_skipped) = filter_methods(&info1, &info2, &args.methods, overrides);
    let tracer_candidates: Vec<Option<String>> = BUILTIN_TRACERS
        .iter()
        .map(|t| t.map(str::to_string))
        .collect();
    let (tracers, tracers_skipped) = filter_tracers(&info1, &info2, &tracer_candidates, overrides);

    for method in &methods_skipped {
        info!("Skipping method {} (unsupported on this pair)", method);
    }
    for tracer in &tracers_skipped {
        info!(
            "Skipping tracer {} (unsupported on this pair)",
            tracer_name(tracer.as_deref())
        );
    }

    info!("Step 3/4: Resolving target block...");
    let target = match args.block {
        Some(block) => block,
        None => lowest_head(&client, endpoint1, endpoint2)
            .context("Neither endpoint reported a head block")?,
    };
    let start = target.saturating_sub(args.block_count.saturating_sub(1));
    info!("Sweeping blocks {}..={} ({} method(s))", start, target, methods.len());

    info!("Step 4/4: Comparing responses...");
    let reporter = DiffReporter::new(&args.output_dir, &endpoint1.name, &endpoint2.name);
    let mut sweep = Sweep {
        client: &client,
        endpoint1,
        endpoint2,
        reporter,
        trace_config: &args.trace_config,
        tracers: &tracers,
        tx_limit: args.tx_limit,
        request_id: 0,
        summary: ScanSummary {
            methods_skipped,
            tracers_skipped: tracers_skipped
                .iter()
                .map(|t| tracer_name(t.as_deref()).to_string())
                .collect(),
            ..Default::default()
        },
    };

    for block in start..=target {
        for method in &methods {
            sweep.run_method(method, block)?;
        }
    }

    info!(
        "Sweep complete: {} paired call(s), {} difference(s)",
        sweep.summary.calls, sweep.summary.diffs_found
    );
    Ok(sweep.summary)
}

/// Detect one endpoint's client identity, degrading to Unknown when the
/// endpoint does not answer `web3_clientVersion`.
fn detect_endpoint(client: &RpcClient, endpoint: &Endpoint) -> ClientInfo {
    match client.client_version(endpoint) {
        Some(version) => {
            let info = detect_client_type(&version);
            info!("{}: {} ({})", endpoint.name, info.name, info.raw_version);
            info
        }
        None => {
            warn!(
                "{}: no response to web3_clientVersion, treating as Unknown",
                endpoint.name
            );
            detect_client_type("")
        }
    }
}

/// The lower of both endpoints' head blocks, or whichever one answered
fn lowest_head(client: &RpcClient, endpoint1: &Endpoint, endpoint2: &Endpoint) -> Option<u64> {
    match (
        client.get_block_number(endpoint1),
        client.get_block_number(endpoint2),
    ) {
        (Some(head1), Some(head2)) => Some(head1.min(head2)),
        (Some(head1), None) => Some(head1),
        (None, Some(head2)) => Some(head2),
        (None, None) => None,
    }
}

/// Per-sweep mutable state
struct Sweep<'a> {
    client: &'a RpcClient,
    endpoint1: &'a Endpoint,
    endpoint2: &'a Endpoint,
    reporter: DiffReporter,
    trace_config: &'a TraceConfig,
    tracers: &'a [Option<String>],
    tx_limit: usize,
    request_id: u64,
    summary: ScanSummary,
}

impl Sweep<'_> {
    fn run_method(&mut self, method: &str, block: u64) -> Result<()> {
        let block_hex = format!("0x{:x}", block);
        let block_id = format!("block_{}", block);

        match method {
            "eth_getBlockByNumber" => {
                self.compare(method, &block_id, json!([block_hex, true]))?;
            }
            "eth_getBlockReceipts" => {
                self.compare(method, &block_id, json!([block_hex]))?;
            }
            "debug_traceBlockByNumber" => {
                for tracer in self.tracers.to_vec() {
                    let trace_params = self.trace_config.with_tracer(tracer.as_deref()).to_params();
                    let identifier =
                        format!("{}_{}", block_id, tracer_name(tracer.as_deref()));
                    self.compare(method, &identifier, json!([block_hex.clone(), trace_params]))?;
                }
            }
            "debug_traceTransaction" => {
                for tx_hash in self.sample_transactions(block) {
                    for tracer in self.tracers.to_vec() {
                        let trace_params =
                            self.trace_config.with_tracer(tracer.as_deref()).to_params();
                        let identifier =
                            format!("tx_{}_{}", tx_hash, tracer_name(tracer.as_deref()));
                        self.compare(method, &identifier, json!([tx_hash.clone(), trace_params]))?;
                    }
                }
            }
            other => {
                // Methods outside the known dispatch take no parameters
                self.compare(other, &block_id, json!([]))?;
            }
        }

        Ok(())
    }

    /// Issue one paired call and persist any divergence
    fn compare(&mut self, method: &str, identifier: &str, params: Value) -> Result<()> {
        self.request_id += 1;
        let (response1, response2) = self.client.call_both(
            self.endpoint1,
            self.endpoint2,
            method,
            params,
            self.request_id,
        );

        let diffs = self
            .reporter
            .save_diff(
                method,
                identifier,
                &response1.request,
                &comparable_body(&response1),
                &comparable_body(&response2),
            )
            .with_context(|| format!("Failed to write diff report for {}/{}", method, identifier))?;

        self.summary.calls += 1;
        self.summary.diffs_found += diffs.len();
        Ok(())
    }

    /// Transaction hashes from endpoint 1's view of the block, capped
    fn sample_transactions(&self, block: u64) -> Vec<String> {
        let Some(body) = self.client.get_block(self.endpoint1, block, false) else {
            warn!(
                "{}: block {} unavailable, skipping per-transaction methods",
                self.endpoint1.name, block
            );
            return Vec::new();
        };

        body.get("transactions")
            .and_then(Value::as_array)
            .map(|txs| {
                txs.iter()
                    .filter_map(Value::as_str)
                    .take(self.tx_limit)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The body handed to the diff computer for one leg
///
/// A transport or HTTP failure is represented as an error body, so a dead
/// endpoint shows up as an error-vs-success divergence instead of a pile of
/// missing-key noise.
fn comparable_body(response: &RpcResponse) -> Value {
    match &response.error {
        Some(error) => json!({"error": error}),
        None => response.response.clone(),
    }
}
