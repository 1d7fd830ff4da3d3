//! Docker socket proxy library.
//!
//! A policy-enforcing HTTP gateway in front of the Docker engine's Unix
//! socket. Only GET/HEAD calls whose path is allowed by a JSON policy reach
//! the engine; everything else is answered by the gateway itself.

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod policy;
pub mod security;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use policy::{Authorizer, Policy};
