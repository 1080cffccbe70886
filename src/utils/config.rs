//! Run configuration: endpoints, settings, and compatibility overrides.
//!
//! Loaded from a YAML file or built directly from a pair of URLs. The YAML
//! shape is:
//!
//! ```yaml
//! endpoints:
//!   - name: Geth
//!     url: http://host1:8545
//!     headers:
//!       Authorization: Bearer token
//!   - name: Nethermind
//!     url: http://host2:8545
//!
//! settings:
//!   timeout: 30
//!   concurrent_requests: 5
//!
//! compatibility:
//!   skip_methods: [debug_traceCall]
//!   skip_tracers: [prestateTracer]
//!   force_methods: []
//!   force_tracers: []
//! ```

use crate::compat::CompatOverrides;
use crate::rpc::Endpoint;
use crate::utils::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT: f64 = 60.0;

/// Default connection-pool bound per endpoint
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Default number of transactions sampled per block for per-tx methods
pub const DEFAULT_TX_LIMIT: usize = 5;

/// Resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoints under comparison; at least 2, the first two are used
    pub endpoints: Vec<Endpoint>,

    /// Per-request timeout in seconds
    pub timeout: f64,

    /// Connection-pool bound for concurrent in-flight requests
    pub max_concurrent: usize,

    /// User-supplied compatibility overrides
    pub compat_overrides: CompatOverrides,
}

impl Config {
    /// Build a configuration from two endpoint URLs
    ///
    /// Names default to `endpoint1`/`endpoint2` when not given.
    pub fn from_urls(
        url1: impl Into<String>,
        url2: impl Into<String>,
        name1: Option<&str>,
        name2: Option<&str>,
    ) -> Self {
        Self {
            endpoints: vec![
                Endpoint::new(name1.unwrap_or("endpoint1"), url1),
                Endpoint::new(name2.unwrap_or("endpoint2"), url2),
            ],
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            compat_overrides: CompatOverrides::default(),
        }
    }

    /// Load a configuration from a YAML file
    ///
    /// # Errors
    /// * I/O or YAML parse failures
    /// * fewer than 2 endpoints
    /// * an endpoint without a `url` field
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let raw: RawConfig = serde_yaml::from_str(&text)?;

        if raw.endpoints.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "configuration requires at least 2 endpoints, found {}",
                raw.endpoints.len()
            )));
        }

        let mut endpoints = Vec::with_capacity(raw.endpoints.len());
        for (i, raw_endpoint) in raw.endpoints.into_iter().enumerate() {
            let name = raw_endpoint
                .name
                .unwrap_or_else(|| format!("endpoint{}", i + 1));
            let url = raw_endpoint.url.ok_or_else(|| {
                ConfigError::Invalid(format!("endpoint '{}' is missing 'url' field", name))
            })?;
            let mut endpoint = Endpoint::new(name, url);
            if let Some(headers) = raw_endpoint.headers {
                endpoint = endpoint.with_headers(headers);
            }
            endpoints.push(endpoint);
        }

        Ok(Self {
            endpoints,
            timeout: raw.settings.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_concurrent: raw
                .settings
                .concurrent_requests
                .unwrap_or(DEFAULT_MAX_CONCURRENT),
            compat_overrides: raw.compatibility,
        })
    }

    /// The two endpoints under comparison
    pub fn endpoint_pair(&self) -> (&Endpoint, &Endpoint) {
        (&self.endpoints[0], &self.endpoints[1])
    }
}

/// Raw YAML shape before validation
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,

    #[serde(default)]
    settings: RawSettings,

    #[serde(default)]
    compatibility: CompatOverrides,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    name: Option<String>,
    url: Option<String>,
    headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    timeout: Option<f64>,
    concurrent_requests: Option<usize>,
}
