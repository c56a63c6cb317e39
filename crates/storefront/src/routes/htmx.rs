//! HTMX request and response helpers.
//!
//! Every HTMX action also works as a plain form post: without the
//! `HX-Request` header the helpers fall back to `303 See Other` redirects.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_LOCATION: HeaderName = HeaderName::from_static("hx-location");
pub const HX_PUSH_URL: HeaderName = HeaderName::from_static("hx-push-url");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// Client-side navigation that swaps `target` with the page at `url` and
/// pushes `url` to the history, without a reload or a scroll reset.
#[must_use]
pub fn navigate(headers: &HeaderMap, url: &str, target: &str) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(url).into_response();
    }
    let location = serde_json::json!({
        "path": url,
        "target": target,
        "swap": "outerHTML show:none",
    });
    match HeaderValue::from_str(&location.to_string()) {
        Ok(value) => ([(HX_LOCATION, value)], "").into_response(),
        Err(_) => Redirect::to(url).into_response(),
    }
}

/// Full page load of `url`.
#[must_use]
pub fn redirect(headers: &HeaderMap, url: &str) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(url).into_response();
    }
    match HeaderValue::from_str(url) {
        Ok(value) => ([(HX_REDIRECT, value)], "").into_response(),
        Err(_) => Redirect::to(url).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn htmx_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        headers
    }

    #[test]
    fn test_is_htmx() {
        assert!(is_htmx(&htmx_headers()));
        assert!(!is_htmx(&HeaderMap::new()));
    }

    #[test]
    fn test_navigate_plain_request_redirects() {
        let response = navigate(&HeaderMap::new(), "/checkout?step=payment", "#checkout");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/checkout?step=payment");
    }

    #[test]
    fn test_navigate_htmx_sets_location() {
        let response = navigate(&htmx_headers(), "/checkout?step=payment", "#checkout");
        assert_eq!(response.status(), StatusCode::OK);
        let location: serde_json::Value =
            serde_json::from_slice(response.headers()[HX_LOCATION].as_bytes()).unwrap();
        assert_eq!(location["path"], "/checkout?step=payment");
        assert_eq!(location["target"], "#checkout");
    }

    #[test]
    fn test_redirect_htmx_forces_full_load() {
        let response = redirect(&htmx_headers(), "/order/confirmed/order_1");
        assert_eq!(response.headers()[HX_REDIRECT], "/order/confirmed/order_1");
    }
}
