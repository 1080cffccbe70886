//! Comparison runners: debug-trace call configuration and the sweep that
//! drives detection, filtering, paired calls, and reporting.

pub mod debug;
pub mod scan;

pub use debug::{tracer_name, TraceConfig, BUILTIN_TRACERS};
pub use scan::{default_methods, run_scan, ScanArgs, ScanSummary};
