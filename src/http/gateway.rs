//! The gateway request pipeline.
//!
//! # Flow
//! ```text
//! admit (request id)
//!   → method gate        (405, nothing forwarded)
//!   → strip headers
//!   → authorization gate (403, nothing forwarded)
//!   → query rewrite
//!   → forward            (502 on transport failure)
//!   → relay backend response verbatim
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use axum::response::{IntoResponse, Response};

use crate::http::client::BackendClient;
use crate::http::request::RequestIdGenerator;
use crate::http::response::Rejection;
use crate::policy::{normalize_path, Authorizer, Decision};
use crate::security::{self, headers, path, query};

/// Shared, read-only state of the gateway handler.
#[derive(Clone)]
pub struct GatewayState {
    pub authorizer: Arc<Authorizer>,
    pub backend: BackendClient,
    pub request_ids: Arc<RequestIdGenerator>,
}

impl GatewayState {
    pub fn new(authorizer: Arc<Authorizer>, backend: BackendClient) -> Self {
        Self {
            authorizer,
            backend,
            request_ids: Arc::new(RequestIdGenerator::new()),
        }
    }
}

/// Handle one inbound call.
pub async fn gateway_handler(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let req_id = state.request_ids.next_id();

    let method = request.method().clone();
    let raw_path = request.uri().path().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        req_id = %req_id,
        method = %method,
        path = %raw_path,
        remote = %remote,
        "Request received"
    );

    if !security::is_read_only(&method) {
        tracing::warn!(req_id = %req_id, method = %method, path = %raw_path, "Blocked method");
        return Rejection::MethodNotAllowed.into_response();
    }

    let (mut parts, body) = request.into_parts();
    headers::strip_hop_by_hop_headers(&mut parts.headers);

    let Some(auth_path) = path::authorization_path(&raw_path) else {
        tracing::warn!(req_id = %req_id, path = %raw_path, "Blocked non-canonical path");
        return Rejection::Forbidden.into_response();
    };

    match state.authorizer.decide(&auth_path) {
        Decision::Allowed(rule) => {
            tracing::debug!(
                req_id = %req_id,
                group = rule.origin(),
                pattern = rule.pattern(),
                "Path allowed"
            );
        }
        decision => {
            tracing::warn!(
                req_id = %req_id,
                path = %raw_path,
                rule = decision.rule().map(|r| r.pattern()),
                "Blocked path"
            );
            return Rejection::Forbidden.into_response();
        }
    }

    let normalized = normalize_path(&auth_path);
    let rewritten = query::rewrite_query(&normalized, parts.uri.query());
    if rewritten.is_some() {
        tracing::info!(req_id = %req_id, "Events filter injected");
    }

    parts.uri = match origin_uri(&raw_path, rewritten.as_deref()) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(req_id = %req_id, error = %e, "Failed to rebuild request uri");
            return Rejection::BadGateway.into_response();
        }
    };

    match state.backend.forward(Request::from_parts(parts, body)).await {
        Ok(response) => {
            tracing::info!(
                req_id = %req_id,
                status = response.status().as_u16(),
                duration = ?started.elapsed(),
                "Request completed"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                req_id = %req_id,
                method = %method,
                path = %raw_path,
                error = ?e,
                "Proxy error"
            );
            Rejection::BadGateway.into_response()
        }
    }
}

/// Origin-form URI carrying the raw path and the rewritten query.
fn origin_uri(path: &str, query: Option<&str>) -> Result<Uri, axum::http::Error> {
    let path_and_query: PathAndQuery = match query {
        Some(query) => format!("{path}?{query}").parse()?,
        None => path.parse()?,
    };
    Ok(Uri::from(path_and_query))
}
