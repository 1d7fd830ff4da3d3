//! Request path canonicalization for authorization.
//!
//! Policy patterns are written against decoded paths, the same form the
//! backend routes on. A percent-encoded or dot-segment variant of a denied
//! path must not slip past a deny rule, so the authorizer only ever sees the
//! decoded path and non-canonical forms (dot segments, doubled separators)
//! are refused outright.

use std::borrow::Cow;

/// Decode `raw` for authorization.
///
/// Returns `None` when the path is not valid UTF-8 after decoding, contains
/// `.` / `..` segments, or contains an empty segment other than a single
/// trailing `/`.
pub fn authorization_path(raw: &str) -> Option<Cow<'_, str>> {
    let decoded = urlencoding::decode(raw).ok()?;
    is_canonical(&decoded).then_some(decoded)
}

fn is_canonical(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return path.is_empty();
    };

    let mut segments = rest.split('/').peekable();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        match segment {
            "." | ".." => return false,
            "" if !last => return false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_pass_through() {
        assert_eq!(authorization_path("/containers/json").as_deref(), Some("/containers/json"));
        assert_eq!(authorization_path("/v1.41/info/").as_deref(), Some("/v1.41/info/"));
        assert_eq!(authorization_path("/").as_deref(), Some("/"));
    }

    #[test]
    fn percent_encoding_is_decoded() {
        assert_eq!(
            authorization_path("/containers%2Fjson").as_deref(),
            Some("/containers/json")
        );
        assert_eq!(
            authorization_path("/containers/%61bc/attach").as_deref(),
            Some("/containers/abc/attach")
        );
    }

    #[test]
    fn dot_segments_are_refused() {
        for raw in [
            "/containers/json/../abc/attach",
            "/./containers/json",
            "/containers/..",
            "/containers/%2e%2e/secrets",
            "/containers/%2E/json",
        ] {
            assert!(authorization_path(raw).is_none(), "{raw} must be refused");
        }
    }

    #[test]
    fn empty_segments_are_refused() {
        for raw in [
            "//secrets",
            "/v1.41//secrets",
            "/containers//json",
            "/containers/json//",
            "/containers%2F%2Fjson",
            "relative/path",
        ] {
            assert!(authorization_path(raw).is_none(), "{raw} must be refused");
        }
    }

    #[test]
    fn single_trailing_slash_is_fine() {
        assert_eq!(authorization_path("/containers/json/").as_deref(), Some("/containers/json/"));
        assert_eq!(authorization_path("").as_deref(), Some(""));
    }

    #[test]
    fn dots_inside_segments_are_fine() {
        assert_eq!(
            authorization_path("/images/alpine:3.19/json").as_deref(),
            Some("/images/alpine:3.19/json")
        );
        assert_eq!(authorization_path("/v1.41/...").as_deref(), Some("/v1.41/..."));
    }

    #[test]
    fn invalid_utf8_is_refused() {
        assert!(authorization_path("/containers/%ff%fe").is_none());
    }
}
