//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → mod.rs (method gate: GET/HEAD only)
//!     → headers.rs (strip hop-by-hop headers)
//!     → path.rs (decode path, refuse non-canonical forms)
//!     → [authorizer decides]
//!     → query.rs (pin the events filter, drop every other query)
//!     → Forward to backend
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input, query strings included
//! - Rejections are ordinary HTTP responses, never connection resets

pub mod headers;
pub mod path;
pub mod query;

use axum::http::Method;

/// Whether the method is one of the side-effect-free read methods.
///
/// The backend is a write-capable control API; everything beyond GET and
/// HEAD is refused before authorization runs.
pub fn is_read_only(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_get_and_head_pass() {
        assert!(is_read_only(&Method::GET));
        assert!(is_read_only(&Method::HEAD));

        for method in [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::CONNECT,
            Method::TRACE,
            Method::from_bytes(b"PROPFIND").unwrap(),
        ] {
            assert!(!is_read_only(&method), "{method} must be rejected");
        }
    }
}
