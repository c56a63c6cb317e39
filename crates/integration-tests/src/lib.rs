//! Integration tests for the Rigby storefront.
//!
//! Each test starts the real storefront router on an ephemeral port, backed
//! by a `wiremock` stand-in for the Medusa store API, and drives it over HTTP
//! with a cookie-keeping client, the way a browser with HTMX would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rigby-integration-tests
//! ```

pub mod fixtures;

use std::net::SocketAddr;

use reqwest::{Client, Response, redirect::Policy};
use rigby_storefront::config::StorefrontConfig;
use rigby_storefront::state::AppState;
use wiremock::MockServer;

/// A running storefront in front of a mocked backend.
pub struct TestContext {
    /// Mocked Medusa backend. Mount mocks per test phase, `reset` between
    /// phases to change what the backend answers.
    pub backend: MockServer,
    pub client: Client,
    addr: SocketAddr,
}

impl TestContext {
    /// Start a storefront on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener or client cannot be created.
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let base_url = format!("http://{addr}");
        let backend_url = backend.uri();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_BASE_URL" => Some(base_url.clone()),
            "MEDUSA_BACKEND_URL" => Some(backend_url.clone()),
            _ => None,
        })
        .expect("Invalid test configuration");

        let app = rigby_storefront::app(AppState::new(config));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed: {e}");
            }
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            backend,
            client,
            addr,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Plain browser GET.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// GET issued by HTMX.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn htmx_get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("HTMX GET failed")
    }

    /// Plain form post.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_form(form))
            .send()
            .await
            .expect("POST failed")
    }

    /// Form post issued by HTMX.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_form(form))
            .send()
            .await
            .expect("HTMX POST failed")
    }
}

/// `application/x-www-form-urlencoded` body.
fn encode_form(form: &[(&str, &str)]) -> String {
    let mut url = reqwest::Url::parse("http://form.invalid/").expect("static URL");
    url.query_pairs_mut().extend_pairs(form);
    url.query().unwrap_or_default().to_string()
}

/// The opening tag of the first element carrying `data-testid="{id}"`.
#[must_use]
pub fn tag_with_test_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let marker = format!("data-testid=\"{id}\"");
    let at = html.find(&marker)?;
    let start = html[..at].rfind('<')?;
    let end = at + html[at..].find('>')?;
    html.get(start..=end)
}

/// Whether the "Continue to payment" button is disabled.
///
/// # Panics
///
/// Panics if the page has no continue button.
#[must_use]
pub fn continue_disabled(html: &str) -> bool {
    tag_with_test_id(html, "submit-delivery-option-button")
        .expect("continue button not rendered")
        .contains("disabled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_with_test_id() {
        let html = r#"<p>x</p><button class="b" data-testid="go"
            disabled>Go</button>"#;
        let tag = tag_with_test_id(html, "go").unwrap_or_default();
        assert!(tag.starts_with("<button"));
        assert!(tag.contains("disabled"));
        assert!(tag_with_test_id(html, "missing").is_none());
    }

    #[test]
    fn test_encode_form() {
        assert_eq!(
            encode_form(&[("email", "a+b@shop.example"), ("city", "New York")]),
            "email=a%2Bb%40shop.example&city=New+York"
        );
    }
}
