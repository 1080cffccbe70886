//! Static per-client capability tables and override application.
//!
//! The tables are necessarily incomplete, so lookups default to *supported*:
//! probing an unrecognized client or an unlisted method still runs, and the
//! override block can force or skip individual items either way.

use super::detect::{ClientInfo, ClientType};
use serde::{Deserialize, Serialize};

/// Display name used for override matching and report paths.
///
/// The `None` tracer (the opcode/struct logger) maps to the literal
/// `"structLogger"`; any named tracer maps to itself.
pub fn tracer_name(tracer: Option<&str>) -> &str {
    tracer.unwrap_or("structLogger")
}

/// User-supplied compatibility overrides
///
/// Read-only during a run. Tracers are matched by [`tracer_name`], so the
/// struct logger can be skipped or forced as `"structLogger"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatOverrides {
    /// Methods to skip even if both clients support them
    #[serde(default)]
    pub skip_methods: Vec<String>,

    /// Tracers to skip even if both clients support them
    #[serde(default)]
    pub skip_tracers: Vec<String>,

    /// Methods to test even if the matrix marks them unsupported
    #[serde(default)]
    pub force_methods: Vec<String>,

    /// Tracers to test even if the matrix marks them unsupported
    #[serde(default)]
    pub force_tracers: Vec<String>,
}

/// Known method support entries: (client, method, supported).
///
/// Methods absent from this table are assumed supported.
const METHOD_SUPPORT: &[(ClientType, &str, bool)] = &[
    (ClientType::Geth, "debug_traceBlockByNumber", true),
    (ClientType::Geth, "debug_traceTransaction", true),
    (ClientType::Geth, "debug_traceCall", true),
    (ClientType::Besu, "debug_traceBlockByNumber", true),
    (ClientType::Besu, "debug_traceTransaction", true),
    (ClientType::Erigon, "debug_traceBlockByNumber", true),
    (ClientType::Erigon, "debug_traceTransaction", true),
    (ClientType::Reth, "debug_traceBlockByNumber", true),
    (ClientType::Reth, "debug_traceTransaction", true),
    // Nimbus-eth1 ships without the debug tracing namespace
    (ClientType::Nimbus, "debug_traceBlockByNumber", false),
    (ClientType::Nimbus, "debug_traceTransaction", false),
    (ClientType::Nimbus, "debug_traceCall", false),
    (ClientType::Ethrex, "debug_traceCall", false),
];

/// Known tracer support entries: (client, tracer, supported).
///
/// Tracers absent from this table are assumed supported. The `None`
/// struct/opcode logger is supported everywhere and never appears here.
const TRACER_SUPPORT: &[(ClientType, &str, bool)] = &[
    (ClientType::Geth, "callTracer", true),
    (ClientType::Geth, "prestateTracer", true),
    (ClientType::Geth, "4byteTracer", true),
    (ClientType::Nethermind, "callTracer", true),
    (ClientType::Nethermind, "prestateTracer", true),
    (ClientType::Erigon, "callTracer", true),
    (ClientType::Erigon, "prestateTracer", true),
    (ClientType::Reth, "callTracer", true),
    (ClientType::Reth, "prestateTracer", true),
    // Besu implements the struct logger but not Geth's built-in JS tracers
    (ClientType::Besu, "callTracer", false),
    (ClientType::Besu, "prestateTracer", false),
    (ClientType::Besu, "4byteTracer", false),
    (ClientType::Nimbus, "callTracer", false),
    (ClientType::Nimbus, "prestateTracer", false),
    (ClientType::Nimbus, "4byteTracer", false),
];

/// Check whether a client is known to support an RPC method
///
/// Methods absent from the table default to supported, since coverage is
/// necessarily incomplete.
pub fn is_method_supported(client_type: ClientType, method: &str) -> bool {
    METHOD_SUPPORT
        .iter()
        .find(|(ct, m, _)| *ct == client_type && *m == method)
        .map(|(_, _, supported)| *supported)
        .unwrap_or(true)
}

/// Check whether a client is known to support a tracer
///
/// `None` selects the opcode/struct logger, which every client provides.
pub fn is_tracer_supported(client_type: ClientType, tracer: Option<&str>) -> bool {
    let Some(tracer) = tracer else {
        return true;
    };

    TRACER_SUPPORT
        .iter()
        .find(|(ct, t, _)| *ct == client_type && *t == tracer)
        .map(|(_, _, supported)| *supported)
        .unwrap_or(true)
}

/// Partition methods into (supported, skipped) for a pair of clients
///
/// A method is supported iff both clients' base matrices support it and it
/// is not skipped by override, or it is force-enabled. Force wins over skip
/// when an item is named in both lists. Input order is preserved.
pub fn filter_methods(
    client1: &ClientInfo,
    client2: &ClientInfo,
    methods: &[String],
    overrides: Option<&CompatOverrides>,
) -> (Vec<String>, Vec<String>) {
    let mut supported = Vec::new();
    let mut skipped = Vec::new();

    for method in methods {
        if accepts(
            is_method_supported(client1.client_type, method)
                && is_method_supported(client2.client_type, method),
            method,
            overrides.map(|o| (&o.force_methods, &o.skip_methods)),
        ) {
            supported.push(method.clone());
        } else {
            skipped.push(method.clone());
        }
    }

    (supported, skipped)
}

/// Partition tracers into (supported, skipped) for a pair of clients
///
/// Override matching is keyed by [`tracer_name`], base-matrix lookup by the
/// raw tracer identity. Input order is preserved.
pub fn filter_tracers(
    client1: &ClientInfo,
    client2: &ClientInfo,
    tracers: &[Option<String>],
    overrides: Option<&CompatOverrides>,
) -> (Vec<Option<String>>, Vec<Option<String>>) {
    let mut supported = Vec::new();
    let mut skipped = Vec::new();

    for tracer in tracers {
        let name = tracer_name(tracer.as_deref());
        if accepts(
            is_tracer_supported(client1.client_type, tracer.as_deref())
                && is_tracer_supported(client2.client_type, tracer.as_deref()),
            name,
            overrides.map(|o| (&o.force_tracers, &o.skip_tracers)),
        ) {
            supported.push(tracer.clone());
        } else {
            skipped.push(tracer.clone());
        }
    }

    (supported, skipped)
}

/// Shared accept decision for methods and tracers.
fn accepts(base_supported: bool, name: &str, lists: Option<(&Vec<String>, &Vec<String>)>) -> bool {
    if let Some((force, skip)) = lists {
        if force.iter().any(|f| f == name) {
            return true;
        }
        if skip.iter().any(|s| s == name) {
            return false;
        }
    }
    base_supported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::detect::detect_client_type;

    #[test]
    fn test_force_wins_over_skip() {
        let geth = detect_client_type("Geth/v1.0");
        let overrides = CompatOverrides {
            skip_methods: vec!["debug_traceCall".to_string()],
            force_methods: vec!["debug_traceCall".to_string()],
            ..Default::default()
        };

        let (supported, skipped) = filter_methods(
            &geth,
            &geth,
            &["debug_traceCall".to_string()],
            Some(&overrides),
        );
        assert_eq!(supported, vec!["debug_traceCall".to_string()]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_partition_preserves_order() {
        let geth = detect_client_type("Geth/v1.0");
        let besu = detect_client_type("besu/v23.7.0");

        let tracers = vec![
            Some("prestateTracer".to_string()),
            None,
            Some("callTracer".to_string()),
        ];
        let (supported, skipped) = filter_tracers(&geth, &besu, &tracers, None);

        assert_eq!(supported, vec![None]);
        assert_eq!(
            skipped,
            vec![
                Some("prestateTracer".to_string()),
                Some("callTracer".to_string())
            ]
        );
    }
}
