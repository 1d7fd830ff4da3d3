//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file; every
//! field has a default so an empty file (or no file) is a valid config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The backend socket and its connection pool.
    pub backend: BackendConfig,

    /// Authorization policy location.
    pub policy: PolicyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address, `host:port` or `:port` for all interfaces.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ":2375".to_string(),
        }
    }
}

/// Backend (Docker engine) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Path of the engine's Unix socket.
    pub socket_path: PathBuf,

    /// Idle connections kept in the pool.
    pub max_idle_connections: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/var/run/docker.sock"),
            max_idle_connections: 100,
        }
    }
}

/// Policy document location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub path: PathBuf,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("policy.json"),
        }
    }
}

/// Timeout configuration, all in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend socket dial timeout.
    pub dial_secs: u64,

    /// How long an idle pooled backend connection is kept.
    pub idle_connection_secs: u64,

    /// Time allowed for a client to send the request head.
    pub header_read_secs: u64,

    /// Time allowed between request body frames.
    pub read_secs: u64,

    /// Time allowed until the response head is produced.
    pub write_secs: u64,

    /// Grace period for in-flight connections on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            dial_secs: 30,
            idle_connection_secs: 90,
            header_read_secs: 10,
            read_secs: 15,
            write_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human readable, for development.
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,

    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            log_filter: "docker_socket_proxy=info,tower_http=warn".to_string(),
        }
    }
}
