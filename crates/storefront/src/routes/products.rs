//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rigby_core::{PricingRegion, format_amount};
use serde::Deserialize;
use tracing::instrument;

use super::Layout;
use crate::error::Result;
use crate::filters;
use crate::medusa::{Product, ProductVariant};
use crate::state::AppState;

/// Products shown per listing page.
const PRODUCTS_PER_PAGE: u64 = 12;

/// Product card data for listings.
#[derive(Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Cheapest variant price, "From" semantics when there are several.
    pub price: Option<String>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, pricing: &PricingRegion) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            thumbnail: product.thumbnail.clone(),
            price: product
                .cheapest_price(&pricing.currency_code)
                .map(|amount| format_amount(amount, pricing, false)),
        }
    }
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub thumbnail: Option<String>,
    pub variants: Vec<VariantView>,
    pub shipping_options: Vec<String>,
}

/// Variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: Option<String>,
    pub in_stock: bool,
}

impl VariantView {
    fn new(variant: &ProductVariant, pricing: &PricingRegion) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            price: variant
                .price_in(&pricing.currency_code)
                .map(|amount| format_amount(amount, pricing, false)),
            in_stock: variant.in_stock(),
        }
    }
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, pricing: &PricingRegion) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            subtitle: product.subtitle.clone(),
            description: product.description.clone().unwrap_or_default(),
            thumbnail: product.thumbnail.clone(),
            variants: product
                .variants
                .iter()
                .map(|v| VariantView::new(v, pricing))
                .collect(),
            shipping_options: product
                .shipping_options
                .iter()
                .map(|o| o.name.clone())
                .collect(),
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let current_page = query.page.unwrap_or(1).max(1);
    let offset = (current_page - 1).saturating_mul(PRODUCTS_PER_PAGE);

    let region = state
        .medusa()
        .default_region(state.config().default_region.as_ref())
        .await?;
    let pricing = state.pricing(&region);
    let list = state.medusa().list_products(PRODUCTS_PER_PAGE, offset).await?;

    let total_pages = list.count.div_ceil(PRODUCTS_PER_PAGE).max(1);

    Ok(ProductsIndexTemplate {
        layout: Layout::new(&state),
        products: list
            .products
            .iter()
            .map(|p| ProductCardView::new(p, &pricing))
            .collect(),
        current_page,
        total_pages,
        has_previous_page: current_page > 1,
        has_next_page: current_page < total_pages,
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.medusa().get_product_by_handle(&handle).await?;
    let region = state
        .medusa()
        .default_region(state.config().default_region.as_ref())
        .await?;

    Ok(ProductShowTemplate {
        layout: Layout::new(&state),
        product: ProductView::new(&product, &state.pricing(&region)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rigby_core::CurrencyCode;

    use super::*;

    fn mug() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "prod_1",
            "title": "Ceramic Mug",
            "handle": "ceramic-mug",
            "variants": [
                { "id": "v_big", "title": "Big", "prices": [
                    { "amount": 2500, "currency_code": "usd" },
                    { "amount": 2300, "currency_code": "eur" }
                ] },
                { "id": "v_small", "title": "Small", "manage_inventory": true,
                  "inventory_quantity": 0, "prices": [
                    { "amount": 1500, "currency_code": "usd" }
                ] }
            ],
            "shipping_options": [{ "id": "so_1", "name": "Courier", "amount": 1000 }]
        }))
        .unwrap()
    }

    #[test]
    fn test_card_shows_cheapest_price_in_region_currency() {
        let usd = PricingRegion::new(CurrencyCode::new("usd"));
        let card = ProductCardView::new(&mug(), &usd);
        assert_eq!(card.price.as_deref(), Some("$15.00"));

        let jpy = PricingRegion::new(CurrencyCode::new("jpy"));
        assert!(ProductCardView::new(&mug(), &jpy).price.is_none());
    }

    #[test]
    fn test_product_view_variants() {
        let usd = PricingRegion::new(CurrencyCode::new("usd"));
        let view = ProductView::new(&mug(), &usd);
        assert_eq!(view.variants.len(), 2);
        assert!(view.variants[0].in_stock);
        assert!(!view.variants[1].in_stock);
        assert_eq!(view.shipping_options, vec!["Courier".to_string()]);
    }
}
