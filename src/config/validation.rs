//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, listen address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::net::parse_listen_address;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("listener.bind_address {0:?} is not a valid address")]
    ListenAddress(String),

    #[error("backend.socket_path must not be empty")]
    EmptySocketPath,

    #[error("policy.path must not be empty")]
    EmptyPolicyPath,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let t = &config.timeouts;
    for (name, value) in [
        ("dial_secs", t.dial_secs),
        ("idle_connection_secs", t.idle_connection_secs),
        ("header_read_secs", t.header_read_secs),
        ("read_secs", t.read_secs),
        ("write_secs", t.write_secs),
        ("shutdown_grace_secs", t.shutdown_grace_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if parse_listen_address(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::ListenAddress(config.listener.bind_address.clone()));
    }

    if config.backend.socket_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySocketPath);
    }

    if config.policy.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPolicyPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
