//! Configuration for `debug_trace*` calls.
//!
//! A trace call either selects a named tracer (callTracer, prestateTracer,
//! 4byteTracer, or a custom one) or falls back to the opcode-level struct
//! logger. The two modes are mutually exclusive: when a tracer is set, the
//! opcode-logger flags are suppressed.

use serde_json::{Map, Value};

pub use crate::compat::tracer_name;

/// The built-in tracers every sweep considers
///
/// `None` is the struct/opcode logger (displayed as `"structLogger"`).
pub const BUILTIN_TRACERS: [Option<&str>; 4] = [
    None,
    Some("callTracer"),
    Some("prestateTracer"),
    Some("4byteTracer"),
];

/// Parameters for a debug-trace call
///
/// Immutable; derive a variant via [`TraceConfig::with_tracer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceConfig {
    /// Named tracer; `None` selects the struct logger
    pub tracer: Option<String>,

    /// Tracer-specific options (e.g. `{"onlyTopCall": true}`)
    pub tracer_config: Option<Value>,

    /// Execution timeout passed through to the node (e.g. `"30s"`)
    pub timeout: Option<String>,

    /// How many blocks the node may re-execute to regenerate state
    pub reexec: Option<u64>,

    // Struct-logger flags, ignored when a tracer is set
    pub enable_memory: bool,
    pub enable_return_data: bool,
    pub disable_stack: bool,
    pub disable_storage: bool,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The JSON trace-options object for the RPC call
    ///
    /// With a tracer set, emits `tracer` plus `tracerConfig` when present
    /// and suppresses the struct-logger flags. Without one, emits whichever
    /// struct-logger flags are set. `timeout` and `reexec` are orthogonal
    /// and emitted whenever set. The default config yields `{}`.
    pub fn to_params(&self) -> Value {
        let mut params = Map::new();

        if let Some(tracer) = &self.tracer {
            params.insert("tracer".to_string(), tracer.clone().into());
            if let Some(config) = &self.tracer_config {
                params.insert("tracerConfig".to_string(), config.clone());
            }
        } else {
            if self.enable_memory {
                params.insert("enableMemory".to_string(), true.into());
            }
            if self.enable_return_data {
                params.insert("enableReturnData".to_string(), true.into());
            }
            if self.disable_stack {
                params.insert("disableStack".to_string(), true.into());
            }
            if self.disable_storage {
                params.insert("disableStorage".to_string(), true.into());
            }
        }

        if let Some(timeout) = &self.timeout {
            params.insert("timeout".to_string(), timeout.clone().into());
        }
        if let Some(reexec) = self.reexec {
            params.insert("reexec".to_string(), reexec.into());
        }

        Value::Object(params)
    }

    /// Copy with the tracer replaced
    ///
    /// `tracer_config` is preserved only when the tracer is unchanged
    /// (including both being unset); switching tracers clears it, since
    /// tracer options are not portable between tracers. All other fields
    /// carry over.
    pub fn with_tracer(&self, tracer: Option<&str>) -> TraceConfig {
        let same_tracer = self.tracer.as_deref() == tracer;
        TraceConfig {
            tracer: tracer.map(str::to_string),
            tracer_config: if same_tracer {
                self.tracer_config.clone()
            } else {
                None
            },
            ..self.clone()
        }
    }
}
