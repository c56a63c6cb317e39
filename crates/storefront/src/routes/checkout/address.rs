//! Address step handler.

use axum::{Form, extract::State, http::HeaderMap, response::Response};
use rigby_core::ContactEmail;
use rigby_core::checkout::CheckoutStep;
use tower_sessions::Session;
use tracing::instrument;

use super::view::AddressForm;
use super::{CheckoutCart, checkout_cart, go_to_step, render, view_for};
use crate::error::{Result, add_breadcrumb};
use crate::medusa::CartUpdate;
use crate::state::AppState;

/// Save the contact email and addresses, then open the delivery step.
///
/// The billing address is the shipping address. Validation and backend
/// failures re-render the open address step with the submitted values.
#[instrument(skip(state, session, headers, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let cart = match checkout_cart(&state, &session, &headers).await? {
        CheckoutCart::Ready(cart) => cart,
        CheckoutCart::Empty(response) => return Ok(response),
    };

    let rejected = |form: AddressForm, message: String| {
        let view = view_for(&state, &cart, CheckoutStep::Address).with_address_error(form, message);
        render(&state, &headers, view)
    };

    let email = match ContactEmail::parse(&form.email) {
        Ok(email) => email,
        Err(e) => return Ok(rejected(form, e.to_string())),
    };
    let missing = form.missing_fields();
    if !missing.is_empty() {
        let message = format!("Please fill in: {}", missing.join(", "));
        return Ok(rejected(form, message));
    }

    add_breadcrumb("checkout", "Submitted address", None);

    let address = form.to_address();
    let update = CartUpdate {
        email: Some(email.as_str().to_string()),
        shipping_address: Some(address.clone()),
        billing_address: Some(address),
        ..CartUpdate::default()
    };

    match state.medusa().update_cart(&cart.id, &update).await {
        Ok(_) => Ok(go_to_step(&headers, CheckoutStep::Delivery)),
        Err(e) => {
            tracing::warn!(cart_id = %cart.id, "Address rejected: {e}");
            Ok(rejected(form, e.to_string()))
        }
    }
}
