//! Rigby storefront library.
//!
//! Server-rendered storefront (Axum, Askama, HTMX) in front of a Medusa
//! commerce backend. The binary in `main.rs` adds process setup (Sentry,
//! tracing subscriber, listener) around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod medusa;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Directory static assets are served from, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router with its session, tracing and request-ID
/// layers.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app(backend: &MockServer) -> Router {
        let backend_url = backend.uri();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_BASE_URL" => Some("http://localhost:8000".to_string()),
            "MEDUSA_BACKEND_URL" => Some(backend_url.clone()),
            "VENDOR_PANEL_URL" => Some("https://vendors.shop.example".to_string()),
            _ => None,
        })
        .unwrap();
        app(AppState::new(config))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let backend = MockServer::start().await;
        let response = get(test_app(&backend), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness_follows_backend() {
        let backend = MockServer::start().await;
        let response = get(test_app(&backend), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&backend)
            .await;
        let response = get(test_app(&backend), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_checkout_without_cart_redirects_to_cart() {
        let backend = MockServer::start().await;
        let response = get(test_app(&backend), "/checkout?step=delivery").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/cart");
    }

    #[tokio::test]
    async fn test_product_listing_renders_prices_and_layout() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/regions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "regions": [{ "id": "reg_jp", "name": "Japan", "currency_code": "jpy" }]
            })))
            .mount(&backend)
            .await;
        Mock::given(method("GET"))
            .and(path("/store/products"))
            .and(query_param("limit", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "products": [{
                    "id": "prod_1", "title": "Tea Bowl", "handle": "tea-bowl",
                    "variants": [{ "id": "v_1", "title": "One", "prices": [
                        { "amount": 1000, "currency_code": "jpy" }
                    ] }]
                }],
                "count": 1, "offset": 0, "limit": 12
            })))
            .mount(&backend)
            .await;

        let response = get(test_app(&backend), "/products").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Tea Bowl"));
        assert!(html.contains("¥1,000"));
        assert!(html.contains("vendors.shop.example"));
        assert!(html.contains("Powered by"));
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "products": [], "count": 0, "offset": 0, "limit": 100
            })))
            .mount(&backend)
            .await;

        let response = get(test_app(&backend), "/products/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
