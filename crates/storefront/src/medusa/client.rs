//! Medusa store API client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use rigby_core::{CartId, LineItemId, OrderId, RegionId, ShippingOptionId, VariantId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use super::MedusaError;
use super::cache::{CacheKey, CacheValue};
use super::types::{Cart, CartUpdate, CompletedCart, Order, Product, ProductList, Region};
use crate::config::MedusaConfig;

const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

#[derive(Deserialize)]
struct CartResponse {
    cart: Cart,
}

#[derive(Deserialize)]
struct RegionsResponse {
    regions: Vec<Region>,
}

#[derive(Deserialize)]
struct OrderResponse {
    order: Order,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

// =============================================================================
// MedusaClient
// =============================================================================

/// Client for the Medusa store API.
///
/// Cheaply cloneable. Products and regions are cached for 5 minutes; carts
/// and orders always go to the backend.
#[derive(Clone)]
pub struct MedusaClient {
    inner: Arc<MedusaClientInner>,
}

struct MedusaClientInner {
    client: reqwest::Client,
    base_url: Url,
    publishable_key: Option<String>,
    cache: Cache<CacheKey, CacheValue>,
}

impl MedusaClient {
    /// Create a new store API client.
    #[must_use]
    pub fn new(config: &MedusaConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        // Joining relative paths onto a base without a trailing slash would
        // drop its last segment.
        let mut base_url = config.backend_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(MedusaClientInner {
                client: reqwest::Client::new(),
                base_url,
                publishable_key: config.publishable_key.clone(),
                cache,
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, MedusaError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.request_url(method, url))
    }

    fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.publishable_key {
            Some(key) => builder.header(PUBLISHABLE_KEY_HEADER, key),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, MedusaError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(MedusaError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<ApiErrorBody>(&response_text).ok();
            let message = body
                .as_ref()
                .and_then(|b| b.message.clone())
                .unwrap_or_else(|| format!("Request failed with status {status}"));

            if status == StatusCode::NOT_FOUND {
                return Err(MedusaError::NotFound(message));
            }

            tracing::warn!(
                status = %status,
                kind = body.and_then(|b| b.kind).as_deref().unwrap_or("unknown"),
                message = %message,
                "Medusa API returned non-success status"
            );
            return Err(MedusaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Medusa response"
            );
            MedusaError::Parse(e)
        })
    }

    async fn send_cart(&self, request: RequestBuilder) -> Result<Cart, MedusaError> {
        self.send::<CartResponse>(request).await.map(|r| r.cart)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List regions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_regions(&self) -> Result<Vec<Region>, MedusaError> {
        if let Some(CacheValue::Regions(regions)) = self.inner.cache.get(&CacheKey::Regions).await {
            debug!("Cache hit for regions");
            return Ok(regions);
        }

        let request = self.request(Method::GET, "store/regions")?;
        let regions = self.send::<RegionsResponse>(request).await?.regions;

        self.inner
            .cache
            .insert(CacheKey::Regions, CacheValue::Regions(regions.clone()))
            .await;

        Ok(regions)
    }

    /// The preferred region if it exists, otherwise the first region.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the backend has no regions at all.
    pub async fn default_region(&self, preferred: Option<&RegionId>) -> Result<Region, MedusaError> {
        let regions = self.list_regions().await?;
        let chosen = preferred
            .and_then(|id| regions.iter().find(|r| &r.id == id))
            .or_else(|| regions.first())
            .cloned();
        chosen.ok_or_else(|| MedusaError::NotFound("no regions configured".to_string()))
    }

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, limit: u64, offset: u64) -> Result<ProductList, MedusaError> {
        let cache_key = CacheKey::Products { limit, offset };
        if let Some(CacheValue::Products(list)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(list);
        }

        let mut url = self.inner.base_url.join("store/products")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let list: ProductList = self.send(self.request_url(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(list.clone()))
            .await;

        Ok(list)
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, MedusaError> {
        let cache_key = CacheKey::Product(handle.to_string());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let mut url = self.inner.base_url.join("store/products")?;
        url.query_pairs_mut().append_pair("handle", handle);

        let list: ProductList = self.send(self.request_url(Method::GET, url)).await?;
        let product = list
            .products
            .into_iter()
            .find(|p| p.handle == handle)
            .ok_or_else(|| MedusaError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch a cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or expired carts.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, MedusaError> {
        let request = self.request(Method::GET, &format!("store/carts/{cart_id}"))?;
        self.send_cart(request).await
    }

    /// Create an empty cart in a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(region_id = %region_id))]
    pub async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, MedusaError> {
        let request = self
            .request(Method::POST, "store/carts")?
            .json(&json!({ "region_id": region_id }));
        self.send_cart(request).await
    }

    /// Update email and addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, update), fields(cart_id = %cart_id))]
    pub async fn update_cart(&self, cart_id: &CartId, update: &CartUpdate) -> Result<Cart, MedusaError> {
        let request = self
            .request(Method::POST, &format!("store/carts/{cart_id}"))?
            .json(update);
        self.send_cart(request).await
    }

    /// Add a variant to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the line item.
    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    pub async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<Cart, MedusaError> {
        let request = self
            .request(Method::POST, &format!("store/carts/{cart_id}/line-items"))?
            .json(&json!({ "variant_id": variant_id, "quantity": quantity }));
        self.send_cart(request).await
    }

    /// Change a line item's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineItemId,
        quantity: u32,
    ) -> Result<Cart, MedusaError> {
        let request = self
            .request(
                Method::POST,
                &format!("store/carts/{cart_id}/line-items/{line_id}"),
            )?
            .json(&json!({ "quantity": quantity }));
        self.send_cart(request).await
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn delete_line_item(&self, cart_id: &CartId, line_id: &LineItemId) -> Result<Cart, MedusaError> {
        let request = self.request(
            Method::DELETE,
            &format!("store/carts/{cart_id}/line-items/{line_id}"),
        )?;
        self.send_cart(request).await
    }

    /// Choose a shipping option for one line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the option; its message is
    /// meant for display.
    #[instrument(skip(self), fields(cart_id = %cart_id, option_id = %option_id, line_item_id = %line_item_id))]
    pub async fn add_shipping_method(
        &self,
        cart_id: &CartId,
        option_id: &ShippingOptionId,
        line_item_id: &LineItemId,
    ) -> Result<Cart, MedusaError> {
        let request = self
            .request(
                Method::POST,
                &format!("store/carts/{cart_id}/shipping-methods"),
            )?
            .json(&json!({
                "option_id": option_id,
                "data": { "line_item_id": line_item_id },
            }));
        self.send_cart(request).await
    }

    /// Initialise payment sessions for every provider in the cart's region.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn create_payment_sessions(&self, cart_id: &CartId) -> Result<Cart, MedusaError> {
        let request = self.request(
            Method::POST,
            &format!("store/carts/{cart_id}/payment-sessions"),
        )?;
        self.send_cart(request).await
    }

    /// Select the payment session for a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not available for the cart.
    #[instrument(skip(self), fields(cart_id = %cart_id, provider_id = %provider_id))]
    pub async fn set_payment_session(&self, cart_id: &CartId, provider_id: &str) -> Result<Cart, MedusaError> {
        let request = self
            .request(
                Method::POST,
                &format!("store/carts/{cart_id}/payment-session"),
            )?
            .json(&json!({ "provider_id": provider_id }));
        self.send_cart(request).await
    }

    /// Complete the cart, placing an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn complete_cart(&self, cart_id: &CartId) -> Result<CompletedCart, MedusaError> {
        let request = self.request(Method::POST, &format!("store/carts/{cart_id}/complete"))?;
        self.send(request).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch a placed order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown orders.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, MedusaError> {
        let request = self.request(Method::GET, &format!("store/orders/{order_id}"))?;
        self.send::<OrderResponse>(request).await.map(|r| r.order)
    }

    /// Check the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the health endpoint does not answer with success.
    pub async fn health(&self) -> Result<(), MedusaError> {
        let response = self.request(Method::GET, "health")?.send().await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer, key: Option<&str>) -> MedusaClient {
        MedusaClient::new(&MedusaConfig {
            backend_url: Url::parse(&server.uri()).unwrap(),
            publishable_key: key.map(String::from),
        })
    }

    fn cart_body() -> serde_json::Value {
        json!({
            "cart": {
                "id": "cart_1",
                "region": { "id": "reg_1", "name": "US", "currency_code": "usd" },
                "items": []
            }
        })
    }

    #[tokio::test]
    async fn test_get_cart_sends_publishable_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/carts/cart_1"))
            .and(header(PUBLISHABLE_KEY_HEADER, "pk_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_body()))
            .expect(1)
            .mount(&server)
            .await;

        let cart = client_for(&server, Some("pk_test"))
            .get_cart(&CartId::new("cart_1"))
            .await
            .unwrap();
        assert_eq!(cart.id.as_str(), "cart_1");
    }

    #[tokio::test]
    async fn test_add_shipping_method_posts_option_and_line_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store/carts/cart_1/shipping-methods"))
            .and(body_json(json!({
                "option_id": "so_1",
                "data": { "line_item_id": "item_1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server, None)
            .add_shipping_method(
                &CartId::new("cart_1"),
                &ShippingOptionId::new("so_1"),
                &LineItemId::new("item_1"),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_backend_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store/carts/cart_1/shipping-methods"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "type": "invalid_data",
                "message": "Shipping Method is not available"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .add_shipping_method(
                &CartId::new("cart_1"),
                &ShippingOptionId::new("so_1"),
                &LineItemId::new("item_1"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MedusaError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "Shipping Method is not available");
    }

    #[tokio::test]
    async fn test_missing_cart_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/carts/cart_gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "type": "not_found",
                "message": "Cart with cart_gone was not found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .get_cart(&CartId::new("cart_gone"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/regions"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).list_regions().await.unwrap_err();
        assert!(matches!(err, MedusaError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_regions_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/regions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "regions": [
                    { "id": "reg_eu", "name": "Europe", "currency_code": "eur" },
                    { "id": "reg_us", "name": "US", "currency_code": "usd" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let first = client.default_region(None).await.unwrap();
        assert_eq!(first.id.as_str(), "reg_eu");
        let preferred = client
            .default_region(Some(&RegionId::new("reg_us")))
            .await
            .unwrap();
        assert_eq!(preferred.id.as_str(), "reg_us");
    }

    #[tokio::test]
    async fn test_product_lookup_by_handle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/products"))
            .and(query_param("handle", "mug"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{ "id": "prod_1", "title": "Mug", "handle": "mug" }],
                "count": 1, "offset": 0, "limit": 100
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let product = client.get_product_by_handle("mug").await.unwrap();
        assert_eq!(product.title, "Mug");
    }

    #[tokio::test]
    async fn test_base_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/store/carts/cart_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = MedusaClient::new(&MedusaConfig {
            backend_url: Url::parse(&format!("{}/api", server.uri())).unwrap(),
            publishable_key: None,
        });
        assert!(client.get_cart(&CartId::new("cart_1")).await.is_ok());
    }
}
