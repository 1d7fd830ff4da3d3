//! Header sanitization.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers before a request is forwarded, including any
//!   header the client nominated through `Connection`
//!
//! # Design Decisions
//! - The backend transport never hijacks connections, so `Upgrade` based
//!   flows (attach, exec streams) must not be attempted through it
//! - Everything else is forwarded untouched

use axum::http::header::{
    HeaderName, CONNECTION, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER,
    TRANSFER_ENCODING, UPGRADE,
};
use axum::http::HeaderMap;

/// Non-standard but still honored by some servers.
const PROXY_CONNECTION: &str = "proxy-connection";
const KEEP_ALIVE: &str = "keep-alive";

/// Remove hop-by-hop headers in place.
pub fn strip_hop_by_hop_headers(headers: &mut HeaderMap) {
    let nominated: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();
    for name in nominated {
        headers.remove(name);
    }

    for name in [
        CONNECTION,
        UPGRADE,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
    ] {
        headers.remove(name);
    }
    headers.remove(PROXY_CONNECTION);
    headers.remove(KEEP_ALIVE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn strips_upgrade_headers_and_keeps_the_rest() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("Upgrade"));
        headers.append(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE, HeaderValue::from_static("tcp"));
        headers.insert("Proxy-Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("accept", HeaderValue::from_static("application/json"));
        headers.insert("user-agent", HeaderValue::from_static("docker-cli"));

        strip_hop_by_hop_headers(&mut headers);

        assert!(headers.get(CONNECTION).is_none());
        assert!(headers.get(UPGRADE).is_none());
        assert!(headers.get(PROXY_CONNECTION).is_none());
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["accept"], "application/json");
    }

    #[test]
    fn strips_standard_hop_by_hop_set() {
        let mut headers = HeaderMap::new();
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(TE, HeaderValue::from_static("trailers"));
        headers.insert(TRAILER, HeaderValue::from_static("expires"));
        headers.insert(PROXY_AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        headers.insert(PROXY_AUTHENTICATE, HeaderValue::from_static("Basic"));
        headers.insert("x-registry-auth", HeaderValue::from_static("e30="));

        strip_hop_by_hop_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["x-registry-auth"], "e30=");
    }

    #[test]
    fn strips_headers_nominated_by_connection() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close, X-Debug-Token , x-trace"));
        headers.insert("x-debug-token", HeaderValue::from_static("secret"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.insert("accept", HeaderValue::from_static("*/*"));

        strip_hop_by_hop_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["accept"], "*/*");
    }

    #[test]
    fn no_op_without_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        strip_hop_by_hop_headers(&mut headers);
        assert_eq!(headers.len(), 1);
    }
}
