//! Order confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use rigby_core::{OrderId, PricingRegion, format_amount};
use tracing::instrument;

use super::Layout;
use super::checkout::view::address_lines;
use crate::error::Result;
use crate::filters;
use crate::medusa::{LineItem, Order};
use crate::state::AppState;

pub struct OrderLineView {
    pub title: String,
    pub quantity: u32,
    pub total: String,
}

/// Order display data for templates.
pub struct OrderView {
    pub id: String,
    pub display_id: Option<u64>,
    pub email: Option<String>,
    pub items: Vec<OrderLineView>,
    pub shipping_address: Vec<String>,
    pub shipping_methods: Vec<String>,
    pub subtotal: String,
    pub shipping: String,
    pub taxes: String,
    pub total: String,
}

impl OrderView {
    #[must_use]
    pub fn new(order: &Order, pricing: &PricingRegion) -> Self {
        let amount = |v: Option<i64>| format_amount(v.unwrap_or(0), pricing, false);
        Self {
            id: order.id.to_string(),
            display_id: order.display_id,
            email: order.email.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    title: item.product_title().to_string(),
                    quantity: item.quantity,
                    total: format_amount(item.line_total(), pricing, false),
                })
                .collect(),
            shipping_address: order
                .shipping_address
                .as_ref()
                .map(address_lines)
                .unwrap_or_default(),
            shipping_methods: order
                .shipping_methods
                .iter()
                .map(|m| m.shipping_option.name.clone())
                .collect(),
            subtotal: amount(
                order
                    .subtotal
                    .or_else(|| Some(LineItem::subtotal_of(&order.items))),
            ),
            shipping: amount(order.shipping_total),
            taxes: amount(order.tax_total),
            total: amount(order.total),
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/confirmed.html")]
pub struct OrderConfirmedTemplate {
    pub layout: Layout,
    pub order: OrderView,
}

/// Display the confirmation of a placed order.
#[instrument(skip(state))]
pub async fn confirmed(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = state.medusa().get_order(&id).await?;
    let pricing = PricingRegion {
        currency_code: order.currency_code.clone(),
        tax_rate: order.tax_rate,
        locale: state.locale(),
    };

    Ok(OrderConfirmedTemplate {
        layout: Layout::new(&state),
        order: OrderView::new(&order, &pricing),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rigby_core::{CurrencyCode, Locale};

    use super::*;

    #[test]
    fn test_order_view_formats_in_order_currency() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "order_1",
            "display_id": 42,
            "currency_code": "eur",
            "items": [{ "id": "item_1", "title": "Mug", "quantity": 2, "unit_price": 1500 }],
            "shipping_methods": [{
                "id": "sm_1", "shipping_option_id": "so_1", "price": 500,
                "shipping_option": { "id": "so_1", "name": "Courier" }
            }],
            "shipping_total": 500,
            "total": 3500
        }))
        .unwrap();
        let pricing = PricingRegion::new(CurrencyCode::new("eur")).with_locale(Locale::DeDe);

        let view = OrderView::new(&order, &pricing);
        assert_eq!(view.display_id, Some(42));
        assert_eq!(view.items[0].total, "30,00\u{a0}€");
        assert_eq!(view.subtotal, "30,00\u{a0}€");
        assert_eq!(view.total, "35,00\u{a0}€");
        assert_eq!(view.shipping_methods, vec!["Courier".to_string()]);
    }
}
