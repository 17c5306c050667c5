//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the monitoring daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Probe scheduling and hysteresis.
    pub pool: PoolConfig,

    /// Probe backend settings.
    pub probe: ProbeConfig,

    /// HTTP control endpoint.
    pub receiver: ReceiverConfig,

    /// Hosts loaded at boot.
    pub loader: LoaderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Time between probes of one host, in milliseconds.
    pub interval_ms: u64,

    /// Consecutive failures (or successes) needed to flip a host.
    pub fail_limit: u32,

    /// Capacity of the start, stop and notify channels.
    pub channel_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            fail_limit: 4,
            channel_capacity: 10,
        }
    }
}

/// Which probe implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// TCP connect to `host[:port]`.
    #[default]
    Tcp,
    /// HTTP HEAD against a URL.
    Http,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub kind: ProbeKind,

    /// Timeout of a single probe in milliseconds.
    pub timeout_ms: u64,

    /// Port used by the TCP probe when the host carries none.
    pub default_port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Tcp,
            timeout_ms: 5_000,
            default_port: 80,
        }
    }
}

/// HTTP control receiver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Enable the HTTP control endpoint.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:7700").
    pub bind_address: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:7700".to_string(),
        }
    }
}

/// Boot-time host list.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoaderConfig {
    pub hosts: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
