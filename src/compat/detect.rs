//! Client identity detection from `web3_clientVersion` strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known execution client implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Geth,
    Nethermind,
    Erigon,
    Besu,
    Reth,
    Nimbus,
    Ethrex,
    Unknown,
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(display_name(*self))
    }
}

/// Detected client identity for one endpoint
///
/// Produced once per endpoint and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Which implementation the version string matched
    pub client_type: ClientType,

    /// The raw version string as reported by the endpoint
    pub raw_version: String,

    /// Human-readable client name (e.g. "Geth", "Unknown")
    pub name: String,
}

impl ClientInfo {
    pub fn new(client_type: ClientType, raw_version: impl Into<String>) -> Self {
        Self {
            client_type,
            raw_version: raw_version.into(),
            name: display_name(client_type).to_string(),
        }
    }
}

/// Substring identifiers checked in order; first match wins.
///
/// "nimbus-eth1" is listed before the bare "nimbus" form so either spelling
/// resolves to the same identity.
const CLIENT_IDENTIFIERS: &[(&str, ClientType)] = &[
    ("geth", ClientType::Geth),
    ("nethermind", ClientType::Nethermind),
    ("erigon", ClientType::Erigon),
    ("besu", ClientType::Besu),
    ("reth", ClientType::Reth),
    ("nimbus-eth1", ClientType::Nimbus),
    ("nimbus", ClientType::Nimbus),
    ("ethrex", ClientType::Ethrex),
];

/// Display name for a client type
pub fn display_name(client_type: ClientType) -> &'static str {
    match client_type {
        ClientType::Geth => "Geth",
        ClientType::Nethermind => "Nethermind",
        ClientType::Erigon => "Erigon",
        ClientType::Besu => "Besu",
        ClientType::Reth => "Reth",
        ClientType::Nimbus => "Nimbus",
        ClientType::Ethrex => "Ethrex",
        ClientType::Unknown => "Unknown",
    }
}

/// Detect the client implementation from a version string
///
/// Case-insensitive substring match against known identifiers. Total over
/// all inputs: unrecognized strings map to [`ClientType::Unknown`].
///
/// # Example
/// ```
/// use json_rpc_scan::compat::{detect_client_type, ClientType};
///
/// let info = detect_client_type("Geth/v1.13.0-stable/linux-amd64/go1.21.0");
/// assert_eq!(info.client_type, ClientType::Geth);
/// assert_eq!(info.name, "Geth");
/// ```
pub fn detect_client_type(version: &str) -> ClientInfo {
    let lowered = version.to_lowercase();

    for (identifier, client_type) in CLIENT_IDENTIFIERS {
        if lowered.contains(identifier) {
            return ClientInfo::new(*client_type, version);
        }
    }

    ClientInfo::new(ClientType::Unknown, version)
}
