//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the commerce backend; the session only holds its ID.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rigby_core::{LineItemId, VariantId, format_amount};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use super::htmx::HX_TRIGGER;
use crate::error::Result;
use crate::filters;
use crate::medusa::{Cart, LineItem};
use crate::models::session;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub handle: Option<String>,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub thumbnail: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: String::new(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(item: &LineItem, cart: &Cart, state: &AppState) -> Self {
        let pricing = state.pricing(&cart.region);
        let variant = item.variant.as_ref();
        Self {
            id: item.id.to_string(),
            handle: variant.map(|v| v.product.handle.clone()),
            title: item.product_title().to_string(),
            variant_title: variant
                .and_then(|v| v.title.clone())
                .filter(|t| t != "Default Title" && t != "Default Variant"),
            quantity: item.quantity,
            price: format_amount(item.unit_price, &pricing, false),
            line_price: format_amount(item.line_total(), &pricing, false),
            thumbnail: item.thumbnail.clone(),
        }
    }
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, state: &AppState) -> Self {
        let pricing = state.pricing(&cart.region);
        let subtotal = cart
            .subtotal
            .unwrap_or_else(|| LineItem::subtotal_of(&cart.items));
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartItemView::new(item, cart, state))
                .collect(),
            subtotal: format_amount(subtotal, &pricing, false),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session's cart from the backend.
///
/// A cart the backend no longer knows is forgotten and reads as `None`.
///
/// # Errors
///
/// Returns an error if the backend call fails for another reason.
pub async fn load_cart(state: &AppState, session: &Session) -> Result<Option<Cart>> {
    let Some(cart_id) = session::cart_id(session).await else {
        return Ok(None);
    };

    match state.medusa().get_cart(&cart_id).await {
        Ok(cart) => Ok(Some(cart)),
        Err(e) if e.is_not_found() => {
            tracing::info!(cart_id = %cart_id, "Cart no longer exists, clearing session");
            session::clear_cart_id(session).await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the session's cart or create one in the default region.
async fn load_or_create_cart(state: &AppState, session: &Session) -> Result<Cart> {
    if let Some(cart) = load_cart(state, session).await? {
        return Ok(cart);
    }
    let region = state
        .medusa()
        .default_region(state.config().default_region.as_ref())
        .await?;
    let cart = state.medusa().create_cart(&region.id).await?;
    session::set_cart_id(session, &cart.id).await?;
    Ok(cart)
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: VariantId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: LineItemId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: LineItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&state, &session)
        .await?
        .map_or_else(CartView::empty, |cart| CartView::new(&cart, &state));

    Ok(CartShowTemplate {
        layout: Layout::new(&state),
        cart,
    })
}

/// Add item to cart (HTMX).
///
/// Creates a new cart if one doesn't exist. Returns the count badge and an
/// HTMX trigger so other cart widgets refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1).max(1);
    let result = async {
        let cart = load_or_create_cart(&state, &session).await?;
        let cart = state
            .medusa()
            .add_line_item(&cart.id, &form.variant_id, quantity)
            .await?;
        Ok::<_, crate::error::AppError>(cart)
    }
    .await;

    match result {
        Ok(cart) => (
            [(HX_TRIGGER, "cart-updated")],
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update cart item quantity (HTMX). A quantity of zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let Some(cart_id) = session::cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let result = if form.quantity == 0 {
        state.medusa().delete_line_item(&cart_id, &form.line_id).await
    } else {
        state
            .medusa()
            .update_line_item(&cart_id, &form.line_id, form.quantity)
            .await
    };

    cart_items_response(&state, result)
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(cart_id) = session::cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let result = state.medusa().delete_line_item(&cart_id, &form.line_id).await;
    cart_items_response(&state, result)
}

fn cart_items_response(
    state: &AppState,
    result: std::result::Result<Cart, crate::medusa::MedusaError>,
) -> Response {
    match result {
        Ok(cart) => (
            [(HX_TRIGGER, "cart-updated")],
            CartItemsTemplate {
                cart: CartView::new(&cart, state),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update cart: {e}");
            CartItemsTemplate {
                cart: CartView::empty(),
            }
            .into_response()
        }
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match load_cart(&state, &session).await {
        Ok(cart) => cart.map_or(0, |c| c.item_count()),
        Err(e) => {
            tracing::warn!("Failed to load cart for count: {e}");
            0
        }
    };

    CartCountTemplate { count }
}
