//! Backend client.
//!
//! # Responsibilities
//! - Own the pooled hyper client bound to the Unix socket connector
//! - Rewrite a request's destination to the backend, and nothing else
//! - Surface transport failures as a typed error for the handler to map
//!
//! # Design Decisions
//! - Connections are pooled; dialing per call is a fallback, not the norm
//! - No retries: a failed exchange is reported once
//! - A backend that accepts but never answers is a transport failure once the
//!   response-head ceiling passes
//! - Dropping the response future abandons the backend exchange, which is
//!   how a client disconnect cancels the in-flight call

use std::time::Duration;

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Response, Uri, Version};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use thiserror::Error;

use crate::config::{BackendConfig, TimeoutConfig};
use crate::net::UnixConnector;

/// Authority used on forwarded requests. The connector ignores it; it only
/// keys the connection pool and fills a missing `Host` header.
pub const BACKEND_AUTHORITY: &str = "docker";

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid backend uri: {0}")]
    Uri(#[from] axum::http::Error),

    #[error("backend request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("backend sent no response head within {0:?}")]
    Timeout(Duration),
}

/// Pooled HTTP/1.1 client for the backend socket.
#[derive(Clone)]
pub struct BackendClient {
    client: Client<UnixConnector, Body>,
    response_timeout: Duration,
}

impl BackendClient {
    pub fn new(backend: &BackendConfig, timeouts: &TimeoutConfig) -> Self {
        let connector = UnixConnector::new(
            backend.socket_path.clone(),
            Duration::from_secs(timeouts.dial_secs),
        );

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_connection_secs))
            .pool_max_idle_per_host(backend.max_idle_connections)
            .build(connector.clone());

        tracing::debug!(
            socket = %connector.socket_path().display(),
            max_idle = backend.max_idle_connections,
            "Backend client ready"
        );

        Self {
            client,
            response_timeout: Duration::from_secs(timeouts.write_secs),
        }
    }

    /// Send `request` to the backend and return its response untouched.
    ///
    /// The request URI must be in origin form (`/path?query`); only scheme
    /// and authority are added.
    pub async fn forward(&self, mut request: Request<Body>) -> Result<Response<Body>, TransportError> {
        *request.uri_mut() = backend_uri(request.uri())?;
        *request.version_mut() = Version::HTTP_11;

        let response = tokio::time::timeout(self.response_timeout, self.client.request(request))
            .await
            .map_err(|_| TransportError::Timeout(self.response_timeout))??;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

fn backend_uri(origin: &Uri) -> Result<Uri, axum::http::Error> {
    let path_and_query = origin
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme("http")
        .authority(BACKEND_AUTHORITY)
        .path_and_query(path_and_query)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_uri_only_changes_destination() {
        let origin: Uri = "/v1.41/events?filters=abc&since=1".parse().unwrap();
        let uri = backend_uri(&origin).unwrap();

        assert_eq!(uri.scheme_str(), Some("http"));
        assert_eq!(uri.authority().unwrap().as_str(), "docker");
        assert_eq!(uri.path(), "/v1.41/events");
        assert_eq!(uri.query(), Some("filters=abc&since=1"));
    }

    #[test]
    fn backend_uri_replaces_absolute_form_authority() {
        let origin: Uri = "http://attacker.example:8080/info".parse().unwrap();
        let uri = backend_uri(&origin).unwrap();
        assert_eq!(uri.to_string(), "http://docker/info");
    }
}
