//! Delivery step handlers.
//!
//! Choosing an option for a line item creates a shipping method on the
//! backend and re-renders the open step; a rejected choice is shown inline
//! above the continue button. Continuing is refused until every line item
//! has a method.

use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use rigby_core::checkout::{CheckoutStep, DeliveryMode, DeliveryState};
use rigby_core::{LineItemId, ShippingOptionId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::view::CheckoutView;
use super::{CheckoutCart, checkout_cart, go_to_step, render, step_url, view_for};
use crate::error::{Result, add_breadcrumb};
use crate::routes::htmx::{HX_PUSH_URL, is_htmx};
use crate::state::AppState;

/// Shipping option chosen for one line item.
#[derive(Debug, Deserialize)]
pub struct ShippingMethodForm {
    pub option_id: ShippingOptionId,
    pub line_item_id: LineItemId,
}

/// Reopen the delivery step from its summary.
///
/// Swaps the container and pushes `?step=delivery` without a reload.
#[instrument(skip(state, session, headers))]
pub async fn edit(State(state): State<AppState>, session: Session, headers: HeaderMap) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    let url = step_url(CheckoutStep::Delivery);
    if !is_htmx(&headers) {
        return Ok(Redirect::to(&url).into_response());
    }

    let view = view_for(&state, &cart, CheckoutStep::Delivery);
    Ok(([(HX_PUSH_URL, url)], render(&state, &headers, view)).into_response())
}

/// Choose a shipping option for a line item.
#[instrument(skip(state, session, headers), fields(option_id = %form.option_id, line_item_id = %form.line_item_id))]
pub async fn set_method(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ShippingMethodForm>,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    add_breadcrumb(
        "checkout",
        "Chose shipping option",
        Some(&[
            ("option_id", form.option_id.as_str()),
            ("line_item_id", form.line_item_id.as_str()),
        ]),
    );

    let mut delivery = DeliveryState::new();
    delivery.observe_mode(DeliveryMode::Open);
    let updated = delivery
        .track(
            state
                .medusa()
                .add_shipping_method(&cart.id, &form.option_id, &form.line_item_id),
        )
        .await;

    if let Some(error) = delivery.error() {
        tracing::info!(cart_id = %cart.id, "Shipping method rejected: {error}");
    }

    let cart = updated.unwrap_or(cart);
    if delivery.error().is_none() && !is_htmx(&headers) {
        return Ok(go_to_step(&headers, CheckoutStep::Delivery));
    }

    let view = CheckoutView::new(
        &cart,
        CheckoutStep::Delivery,
        &state.pricing(&cart.region),
        &delivery,
    );
    Ok(render(&state, &headers, view))
}

/// Continue to the payment step.
///
/// Re-checks the cart: with a line item still lacking a method the open step
/// is re-rendered with the refusal as its error.
#[instrument(skip(state, session, headers))]
pub async fn continue_to_payment(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    let mut delivery = DeliveryState::new();
    delivery.observe_mode(DeliveryMode::Open);

    match delivery.advance(&cart.delivery_progress()) {
        Ok(step) => {
            tracing::debug!(cart_id = %cart.id, target = %step, "Leaving delivery step");
            Ok(go_to_step(&headers, step))
        }
        Err(incomplete) => {
            delivery.request_failed(&incomplete);
            let view = CheckoutView::new(
                &cart,
                CheckoutStep::Delivery,
                &state.pricing(&cart.region),
                &delivery,
            );
            Ok(render(&state, &headers, view))
        }
    }
}
