//! Medusa store API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` against `{MEDUSA_BACKEND_URL}/store/...`
//! - The backend is the source of truth - carts are never cached or mutated
//!   locally, every mutation returns the refreshed cart
//! - Products and regions are cached in memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use rigby_storefront::medusa::MedusaClient;
//!
//! let client = MedusaClient::new(&config.medusa);
//!
//! let region = client.default_region(None).await?;
//! let cart = client.create_cart(&region.id).await?;
//! let cart = client.add_line_item(&cart.id, &variant_id, 1).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::MedusaClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the Medusa store API.
#[derive(Debug, Error)]
pub enum MedusaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request. Displays the backend's message so it
    /// can be shown to shoppers as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl MedusaError {
    /// Whether the backend reported a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}
