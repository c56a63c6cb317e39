//! Application state shared across handlers.

use std::sync::Arc;

use rigby_core::{Locale, PricingRegion};

use crate::config::StorefrontConfig;
use crate::medusa::{MedusaClient, Region};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the commerce backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    medusa: MedusaClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let medusa = MedusaClient::new(&config.medusa);
        Self {
            inner: Arc::new(AppStateInner { config, medusa }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Medusa store API client.
    #[must_use]
    pub fn medusa(&self) -> &MedusaClient {
        &self.inner.medusa
    }

    /// Locale all prices are rendered in.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.inner.config.locale
    }

    /// Pricing context for a region in the configured locale.
    #[must_use]
    pub fn pricing(&self, region: &Region) -> PricingRegion {
        region.pricing(self.locale())
    }
}
