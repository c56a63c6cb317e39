//! Payment step handler.

use axum::{Form, extract::State, http::HeaderMap, response::Response};
use rigby_core::checkout::CheckoutStep;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{CheckoutCart, checkout_cart, go_to_step, render, view_for};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub provider_id: String,
}

/// Select the payment session of a provider, then open the review step.
///
/// Only providers with a session on the cart can be selected.
#[instrument(skip(state, session, headers))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    let offered = cart
        .payment_sessions
        .iter()
        .any(|s| s.provider_id == form.provider_id);
    if !offered {
        let view = view_for(&state, &cart, CheckoutStep::Payment)
            .with_payment_error("This payment method is not available for your cart");
        return Ok(render(&state, &headers, view));
    }

    add_breadcrumb(
        "checkout",
        "Selected payment provider",
        Some(&[("provider_id", form.provider_id.as_str())]),
    );

    match state
        .medusa()
        .set_payment_session(&cart.id, &form.provider_id)
        .await
    {
        Ok(_) => Ok(go_to_step(&headers, CheckoutStep::Review)),
        Err(e) => {
            tracing::warn!(cart_id = %cart.id, provider_id = %form.provider_id, "Payment selection rejected: {e}");
            let view = view_for(&state, &cart, CheckoutStep::Payment).with_payment_error(e.to_string());
            Ok(render(&state, &headers, view))
        }
    }
}
