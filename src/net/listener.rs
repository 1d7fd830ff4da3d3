//! TCP listener setup.
//!
//! # Responsibilities
//! - Parse the configured listen address (`host:port` or `:port`)
//! - Bind the listening socket

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listen address is not a valid socket address.
    #[error("invalid listen address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a listen address. A bare `:port` binds every IPv4 interface.
pub fn parse_listen_address(address: &str) -> Result<SocketAddr, ListenerError> {
    let candidate = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    };

    candidate.parse().map_err(|source| ListenerError::Address {
        address: address.to_string(),
        source,
    })
}

/// Bind the listening socket.
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    let addr = parse_listen_address(address)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { address: addr, source })?;

    tracing::info!(address = %addr, "Listener bound");
    Ok(listener)
}
