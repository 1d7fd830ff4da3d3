//! Liveness endpoint.
//!
//! Answers `200 ok` for any method, outside the authorization pipeline. It
//! says nothing about the backend socket; Docker's own `/_ping` (allowed by
//! every policy) covers that.

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Path served by [`liveness`].
pub const LIVENESS_PATH: &str = "/healthz";

pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
