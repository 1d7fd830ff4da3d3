//! HTTP server setup and connection serving.
//!
//! # Responsibilities
//! - Build the Axum router: liveness route + gateway fallback
//! - Wire up middleware (body read timeout, tracing)
//! - Accept connections and serve each one on its own task with hyper's
//!   HTTP/1.1 connection driver (header read timeout)
//! - Graceful shutdown: stop accepting, drain open connections within the
//!   grace period

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::routing::any;
use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tower::Service;
use tower_http::timeout::RequestBodyTimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, TimeoutConfig};
use crate::health;
use crate::http::client::BackendClient;
use crate::http::gateway::{gateway_handler, GatewayState};
use crate::lifecycle::ShutdownSignal;
use crate::net::ConnectionTracker;
use crate::policy::Authorizer;

/// HTTP server fronting the backend socket.
pub struct GatewayServer {
    router: Router,
    timeouts: TimeoutConfig,
    connections: ConnectionTracker,
}

impl GatewayServer {
    /// Create a new server for the given configuration and compiled policy.
    pub fn new(config: &GatewayConfig, authorizer: Arc<Authorizer>) -> Self {
        let backend = BackendClient::new(&config.backend, &config.timeouts);
        let state = GatewayState::new(authorizer, backend);

        Self {
            router: Self::build_router(&config.timeouts, state),
            timeouts: config.timeouts.clone(),
            connections: ConnectionTracker::new(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(timeouts: &TimeoutConfig, state: GatewayState) -> Router {
        Router::new()
            .route(health::LIVENESS_PATH, any(health::liveness))
            .fallback(gateway_handler)
            .with_state(state)
            .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(timeouts.read_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn connections(&self) -> &ConnectionTracker {
        &self.connections
    }

    /// Serve connections until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(Duration::from_secs(self.timeouts.header_read_secs));

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };
                    self.spawn_connection(stream, peer, builder.clone(), shutdown.clone());
                }
                _ = shutdown.recv() => break,
            }
        }

        drop(listener);
        let open = self.connections.active_count();
        tracing::info!(open_connections = open, "Stopped accepting, draining connections");

        let grace = Duration::from_secs(self.timeouts.shutdown_grace_secs);
        if self.connections.drain(grace).await {
            tracing::info!("HTTP server stopped");
        } else {
            tracing::error!(
                grace = ?grace,
                open_connections = self.connections.active_count(),
                "Shutdown grace period exceeded, abandoning open connections"
            );
        }
        Ok(())
    }

    fn spawn_connection(
        &self,
        stream: TcpStream,
        peer: SocketAddr,
        builder: http1::Builder,
        mut shutdown: ShutdownSignal,
    ) {
        let guard = self.connections.track();
        let router = self.router.clone();

        tokio::spawn(async move {
            let connection_id = guard.id();
            tracing::debug!(connection_id = %connection_id, peer = %peer, "Connection accepted");

            let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
                request.extensions_mut().insert(ConnectInfo(peer));
                router.clone().call(request)
            });

            let mut conn = std::pin::pin!(builder.serve_connection(TokioIo::new(stream), service));
            let mut draining = false;

            let result = loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = shutdown.recv(), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            };

            if let Err(e) = result {
                tracing::debug!(connection_id = %connection_id, error = %e, "Connection ended with error");
            }
            drop(guard);
        });
    }
}
