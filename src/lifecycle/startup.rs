//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the policy and compile the authorizer
//! - Bind the listener
//! - Wire termination signals to graceful shutdown and serve
//!
//! # Design Decisions
//! - Fail fast: a missing policy, malformed document or bad pattern stops the
//!   process before any traffic is served
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::GatewayServer;
use crate::lifecycle::{Shutdown, TerminationSignals};
use crate::net;
use crate::policy::{load_policy, Authorizer};

/// Build everything needed to serve: compiled policy, server, bound listener.
pub async fn prepare(config: &GatewayConfig) -> Result<(GatewayServer, TcpListener), GatewayError> {
    let policy = load_policy(&config.policy.path)?;
    let authorizer = Arc::new(Authorizer::new(&policy)?);

    tracing::info!(
        patterns = policy.pattern_count(),
        denied = authorizer.denied_rules().len(),
        allowed = authorizer.allowed_rules().len(),
        "Policy compiled"
    );

    let server = GatewayServer::new(config, authorizer);
    let listener = net::bind(&config.listener.bind_address).await?;

    Ok((server, listener))
}

/// Run the gateway until SIGINT/SIGTERM, then drain and return.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    tracing::info!(
        listen = %config.listener.bind_address,
        socket = %config.backend.socket_path.display(),
        policy = %config.policy.path.display(),
        "Starting docker socket proxy"
    );

    let (server, listener) = prepare(&config).await?;
    let mut signals = TerminationSignals::install().map_err(GatewayError::Signal)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let name = signals.recv().await;
        tracing::warn!(signal = name, "Shutdown signal received");
        shutdown.trigger();
    });

    server
        .run(listener, server_shutdown)
        .await
        .map_err(GatewayError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
