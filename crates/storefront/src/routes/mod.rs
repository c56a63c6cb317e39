//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page (featured products)
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (backend reachable)
//!
//! # Products
//! GET  /products                   - Product listing
//! GET  /products/{handle}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                       - Cart page
//! POST /cart/add                   - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update                - Update quantity (returns cart_items fragment)
//! POST /cart/remove                - Remove item (returns cart_items fragment)
//! GET  /cart/count                 - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout?step=..           - Checkout page, `#checkout` fragment for HTMX
//! POST /checkout/address           - Save email and addresses, go to delivery
//! GET  /checkout/delivery/edit     - Reopen the delivery step
//! POST /checkout/delivery/method   - Choose a shipping option for a line item
//! POST /checkout/delivery/continue - Go to payment once every item has a method
//! POST /checkout/payment           - Select a payment provider, go to review
//! POST /checkout/complete          - Place the order
//!
//! # Orders
//! GET  /order/confirmed/{id}       - Order confirmation
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod htmx;
pub mod order;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Data every full page passes to `base.html`.
#[derive(Clone)]
pub struct Layout {
    /// Vendor panel linked from the navigation bar.
    pub vendor_panel_url: String,
}

impl Layout {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            vendor_panel_url: state.config().vendor_panel_url.to_string(),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/address", post(checkout::address::submit))
        .route("/delivery/edit", get(checkout::delivery::edit))
        .route("/delivery/method", post(checkout::delivery::set_method))
        .route("/delivery/continue", post(checkout::delivery::continue_to_payment))
        .route("/payment", post(checkout::payment::select))
        .route("/complete", post(checkout::complete::place_order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/order/confirmed/{id}", get(order::confirmed))
}
