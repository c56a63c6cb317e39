//! Order placement.

use axum::{extract::State, http::HeaderMap, response::Response};
use rigby_core::checkout::CheckoutStep;
use tower_sessions::Session;
use tracing::instrument;

use super::{CheckoutCart, checkout_cart, render, view_for};
use crate::error::{Result, add_breadcrumb};
use crate::medusa::CompletedCart;
use crate::models::session;
use crate::routes::htmx;
use crate::state::AppState;

/// Complete the cart and go to the order confirmation.
///
/// The session forgets the cart once it has become an order. Completion that
/// comes back as a cart (e.g. the payment needs more action) is shown on the
/// review step.
#[instrument(skip(state, session, headers))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    add_breadcrumb("checkout", "Placing order", Some(&[("cart_id", cart.id.as_str())]));

    let failed = |message: String| {
        let view = view_for(&state, &cart, CheckoutStep::Review).with_review_error(message);
        render(&state, &headers, view)
    };

    match state.medusa().complete_cart(&cart.id).await {
        Ok(CompletedCart::Order(order)) => {
            tracing::info!(cart_id = %cart.id, order_id = %order.id, "Order placed");
            session::clear_cart_id(&session).await?;
            Ok(htmx::redirect(&headers, &format!("/order/confirmed/{}", order.id)))
        }
        Ok(CompletedCart::Cart(_)) => {
            tracing::warn!(cart_id = %cart.id, "Cart completion did not produce an order");
            Ok(failed(
                "Your payment could not be completed. Please review your payment details."
                    .to_string(),
            ))
        }
        Ok(CompletedCart::Swap(_)) => {
            tracing::error!(cart_id = %cart.id, "Cart completion produced a swap");
            Ok(failed("Your order could not be placed.".to_string()))
        }
        Err(e) => {
            tracing::warn!(cart_id = %cart.id, "Order placement failed: {e}");
            Ok(failed(e.to_string()))
        }
    }
}
