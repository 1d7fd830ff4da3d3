//! Top-level startup error.

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::ListenerError;
use crate::policy::PolicyError;

/// Anything that stops the gateway from starting or serving.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
