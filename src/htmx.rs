/// HTMX utils
use axum::http::{HeaderMap, HeaderValue};

/// Tell the client to navigate. This is the explicit refresh signal after a
/// successful write: redirecting to `/` re-renders the overview against the
/// updated sheet.
pub fn redirect(to: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Hx-Redirect",
        HeaderValue::from_str(to)
            .unwrap_or(HeaderValue::from_str("/").unwrap()),
    );
    headers
}
