//! Checkout route handlers.
//!
//! The active step lives in the URL (`/checkout?step=delivery`). Full page
//! loads render `checkout/page.html`; HTMX requests get the `#checkout`
//! container alone, and every step transition swaps that container and
//! pushes the new URL.

pub mod address;
pub mod complete;
pub mod delivery;
pub mod payment;
pub mod view;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use rigby_core::checkout::{CheckoutStep, DeliveryState, delivery_mode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use self::view::{CheckoutView, default_step};
use super::Layout;
use super::cart::load_cart;
use super::htmx::{self, is_htmx};
use crate::error::Result;
use crate::filters;
use crate::medusa::Cart;
use crate::state::AppState;

/// CSS selector of the swapped checkout container.
pub const CHECKOUT_TARGET: &str = "#checkout";

/// URL of a checkout step.
#[must_use]
pub fn step_url(step: CheckoutStep) -> String {
    format!("/checkout{}", step.query())
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/page.html")]
pub struct CheckoutPageTemplate {
    pub layout: Layout,
    pub view: CheckoutView,
}

/// Checkout container fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/container.html")]
pub struct CheckoutFragmentTemplate {
    pub view: CheckoutView,
}

#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<String>,
}

/// Render the checkout as a fragment or as a full page.
fn render(state: &AppState, headers: &HeaderMap, view: CheckoutView) -> Response {
    if is_htmx(headers) {
        CheckoutFragmentTemplate { view }.into_response()
    } else {
        CheckoutPageTemplate {
            layout: Layout::new(state),
            view,
        }
        .into_response()
    }
}

/// Build the view for a step with a fresh request state.
fn view_for(state: &AppState, cart: &Cart, step: CheckoutStep) -> CheckoutView {
    let mut delivery = DeliveryState::new();
    delivery.observe_mode(delivery_mode(Some(step)));
    CheckoutView::new(cart, step, &state.pricing(&cart.region), &delivery)
}

/// Navigate to a step, swapping the container and pushing its URL.
fn go_to_step(headers: &HeaderMap, step: CheckoutStep) -> Response {
    htmx::navigate(headers, &step_url(step), CHECKOUT_TARGET)
}

/// Result of loading the cart a checkout action works on.
enum CheckoutCart {
    Ready(Cart),
    /// No cart, or nothing in it: the shopper belongs on the cart page.
    Empty(Response),
}

async fn checkout_cart(state: &AppState, session: &Session, headers: &HeaderMap) -> Result<CheckoutCart> {
    match load_cart(state, session).await? {
        Some(cart) if !cart.items.is_empty() => Ok(CheckoutCart::Ready(cart)),
        _ => Ok(CheckoutCart::Empty(htmx::redirect(headers, "/cart"))),
    }
}

/// Display the checkout page.
///
/// Entering the payment step initialises payment sessions when the cart has
/// none yet.
#[instrument(skip(state, session, headers))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<StepQuery>,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    let step = CheckoutStep::from_query(query.step.as_deref()).unwrap_or_else(|| default_step(&cart));
    if query.step.is_none() {
        return Ok(Redirect::to(&step_url(step)).into_response());
    }

    if step == CheckoutStep::Payment && cart.payment_sessions.is_empty() {
        return Ok(match state.medusa().create_payment_sessions(&cart.id).await {
            Ok(cart) => render(&state, &headers, view_for(&state, &cart, step)),
            Err(e) => {
                tracing::warn!(cart_id = %cart.id, "Failed to create payment sessions: {e}");
                let view = view_for(&state, &cart, step).with_payment_error(e.to_string());
                render(&state, &headers, view)
            }
        });
    }

    Ok(render(&state, &headers, view_for(&state, &cart, step)))
}
