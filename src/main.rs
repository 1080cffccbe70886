//! json-rpc-scan CLI
//!
//! Differential testing between two JSON-RPC execution-client endpoints:
//! the same requests go to both nodes, responses are structurally diffed,
//! and divergences land under an output directory.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use json_rpc_scan::compat::{detect_client_type, tracer_name};
use json_rpc_scan::runners::{default_methods, run_scan, ScanArgs, TraceConfig};
use json_rpc_scan::rpc::{Endpoint, RpcClient};
use json_rpc_scan::utils::config::{Config, DEFAULT_TX_LIMIT};
use std::path::PathBuf;
use std::time::Duration;

/// json-rpc-scan - differential testing for execution-client JSON-RPC
#[derive(Parser, Debug)]
#[command(name = "json-rpc-scan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare responses from two endpoints
    Compare {
        /// YAML configuration file (alternative to --url1/--url2)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// First endpoint URL
        #[arg(long)]
        url1: Option<String>,

        /// Second endpoint URL
        #[arg(long)]
        url2: Option<String>,

        /// Display name for the first endpoint
        #[arg(long)]
        name1: Option<String>,

        /// Display name for the second endpoint
        #[arg(long)]
        name2: Option<String>,

        /// Directory diff reports are written under
        #[arg(short, long, default_value = "diffs")]
        output_dir: PathBuf,

        /// Target block number (defaults to the lower of both heads)
        #[arg(short, long)]
        block: Option<u64>,

        /// How many consecutive blocks to sweep
        #[arg(long, default_value = "1")]
        blocks: u64,

        /// Method to test (repeatable; defaults to the built-in set)
        #[arg(short, long = "method")]
        methods: Vec<String>,

        /// Max transactions sampled per block for per-tx methods
        #[arg(long, default_value_t = DEFAULT_TX_LIMIT)]
        tx_limit: usize,

        /// Trace timeout passed through to the nodes (e.g. "30s")
        #[arg(long)]
        trace_timeout: Option<String>,
    },

    /// Detect which client implementation an endpoint runs
    Detect {
        /// Endpoint URL
        #[arg(short, long)]
        url: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Compare {
            config,
            url1,
            url2,
            name1,
            name2,
            output_dir,
            block,
            blocks,
            methods,
            tx_limit,
            trace_timeout,
        } => {
            let config = match (config, url1, url2) {
                (Some(path), _, _) => Config::from_yaml(&path)?,
                (None, Some(url1), Some(url2)) => {
                    Config::from_urls(url1, url2, name1.as_deref(), name2.as_deref())
                }
                _ => bail!("Provide either --config or both --url1 and --url2"),
            };

            let args = ScanArgs {
                config,
                output_dir,
                block,
                block_count: blocks.max(1),
                methods: if methods.is_empty() {
                    default_methods()
                } else {
                    methods
                },
                trace_config: TraceConfig {
                    timeout: trace_timeout,
                    ..TraceConfig::default()
                },
                tx_limit,
            };

            let summary = run_scan(args)?;

            println!();
            println!("Paired calls:     {}", summary.calls);
            println!("Differences:      {}", summary.diffs_found);
            if !summary.methods_skipped.is_empty() {
                println!("Skipped methods:  {}", summary.methods_skipped.join(", "));
            }
            if !summary.tracers_skipped.is_empty() {
                println!("Skipped tracers:  {}", summary.tracers_skipped.join(", "));
            }
        }

        Commands::Detect { url, timeout } => {
            detect_endpoint(&url, timeout)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Query an endpoint's version string and print the detected identity
fn detect_endpoint(url: &str, timeout_secs: u64) -> Result<()> {
    let client = RpcClient::new(Duration::from_secs(timeout_secs), 1)?;
    let endpoint = Endpoint::new("endpoint", url);

    match client.client_version(&endpoint) {
        Some(version) => {
            let info = detect_client_type(&version);
            println!("Client:  {}", info.name);
            println!("Version: {}", info.raw_version);
        }
        None => bail!("Endpoint did not answer web3_clientVersion"),
    }

    Ok(())
}

/// Display version information
fn display_version() {
    println!("json-rpc-scan v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Differential testing for Ethereum execution-client JSON-RPC endpoints.");
    println!(
        "Built-in tracers: {}",
        json_rpc_scan::BUILTIN_TRACERS
            .iter()
            .map(|t| tracer_name(*t))
            .collect::<Vec<_>>()
            .join(", ")
    );
}
