//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::Layout;
use super::products::ProductCardView;
use crate::filters;
use crate::state::AppState;

/// Number of featured products on the home page.
const FEATURED_PRODUCTS: u64 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured_products: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Backend failures degrade to an empty product grid.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let medusa = state.medusa();
    let catalog = async {
        let region = medusa
            .default_region(state.config().default_region.as_ref())
            .await?;
        let list = medusa.list_products(FEATURED_PRODUCTS, 0).await?;
        Ok::<_, crate::medusa::MedusaError>((region, list))
    };

    let featured_products = catalog.await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |(region, list)| {
            let pricing = state.pricing(&region);
            list.products
                .iter()
                .map(|p| ProductCardView::new(p, &pricing))
                .collect()
        },
    );

    HomeTemplate {
        layout: Layout::new(&state),
        featured_products,
    }
}
