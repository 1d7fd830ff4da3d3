//! Query string rewriting.
//!
//! Query parameters are not covered by the authorization decision, so none
//! are trusted. The event stream keeps its non-filter parameters but its
//! `filters` value is pinned to container lifecycle events; every other path
//! loses its query string entirely.

use url::form_urlencoded;

/// Normalized path of the event stream endpoint.
pub const EVENTS_PATH: &str = "/events";

/// Name of the filter query parameter.
pub const FILTERS_PARAM: &str = "filters";

/// Container start/die/destroy notifications only.
pub const EVENTS_FILTER: &str =
    r#"{"type":{"container":true},"event":{"start":true,"die":true,"destroy":true}}"#;

/// Compute the query string to forward, `None` meaning "no query".
///
/// `normalized_path` is the path as seen by the authorizer; `query` is the
/// raw inbound query string.
pub fn rewrite_query(normalized_path: &str, query: Option<&str>) -> Option<String> {
    if normalized_path != EVENTS_PATH {
        return None;
    }

    let mut params: Vec<(String, String)> = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(key, _)| key != FILTERS_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    params.push((FILTERS_PARAM.to_string(), EVENTS_FILTER.to_string()));
    // Stable: repeated keys keep their relative order.
    params.sort_by(|a, b| a.0.cmp(&b.0));

    Some(
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish(),
    )
}
