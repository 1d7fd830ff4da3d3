//! Gateway responses that never reach the backend.
//!
//! # Design Decisions
//! - Rejections are plain-text status responses, never connection resets
//! - Bodies are fixed strings; transport error details stay in the logs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A terminal outcome produced by the gateway itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Method other than GET or HEAD.
    MethodNotAllowed,
    /// Path refused by the policy.
    Forbidden,
    /// The backend could not be reached or the exchange failed.
    BadGateway,
}

impl Rejection {
    pub fn status(self) -> StatusCode {
        match self {
            Rejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::Forbidden => StatusCode::FORBIDDEN,
            Rejection::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::MethodNotAllowed => "Method Not Allowed",
            Rejection::Forbidden => "Forbidden",
            Rejection::BadGateway => "Upstream error",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
