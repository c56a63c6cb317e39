//! Session-stored shopper state.

use rigby_core::CartId;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for storing the Medusa cart ID.
    pub const CART_ID: &str = "cart_id";
}

/// Get the cart ID from the session.
///
/// A session store failure reads as "no cart" and is logged.
pub async fn cart_id(session: &Session) -> Option<CartId> {
    match session.get::<CartId>(keys::CART_ID).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Failed to read cart ID from session: {e}");
            None
        }
    }
}

/// Set the cart ID in the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &CartId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_ID, cart_id).await
}

/// Forget the cart, e.g. once it has become an order.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_cart_id(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CartId>(keys::CART_ID).await.map(|_| ())
}
