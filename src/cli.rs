//! Command line interface.
//!
//! Every flag can also come from the environment. Flags left unset fall back
//! to the config file (if any), then to built-in defaults.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::config::{self, ConfigError, GatewayConfig, LogFormat};
use crate::error::GatewayError;
use crate::policy::PolicyError;

#[derive(Debug, Parser)]
#[command(name = "docker-socket-proxy")]
#[command(about = "Docker socket proxy using a JSON policy for access control", long_about = None)]
#[command(after_help = "Example:\n  DOCKER_SOCKET_PATH=/run/docker.sock docker-socket-proxy --listen-addr :2376")]
pub struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the authorization policy JSON file [default: policy.json]
    #[arg(long, env = "POLICY")]
    pub policy: Option<PathBuf>,

    /// Address to listen on [default: :2375]
    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Path to the Docker Unix socket [default: /var/run/docker.sock]
    #[arg(long, env = "DOCKER_SOCKET_PATH")]
    pub socket_path: Option<PathBuf>,

    /// Log output format [default: json]
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Resolve the effective, validated configuration.
    pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply(&mut config);
        config::validate(&config)?;
        Ok(config)
    }

    fn apply(self, config: &mut GatewayConfig) {
        if let Some(policy) = self.policy {
            config.policy.path = policy;
        }
        if let Some(address) = self.listen_addr {
            config.listener.bind_address = address;
        }
        if let Some(socket) = self.socket_path {
            config.backend.socket_path = socket;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

/// Help text worth printing after `error`, if the operator likely started
/// the binary without pointing it at a policy.
pub fn usage_hint(error: &GatewayError) -> Option<String> {
    match error {
        GatewayError::Policy(PolicyError::NotFound(_)) => {
            Some(Cli::command().render_help().to_string())
        }
        _ => None,
    }
}
