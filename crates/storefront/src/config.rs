//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `STOREFRONT_LOCALE` - Locale prices are formatted in (default: en-US)
//! - `STOREFRONT_DEFAULT_REGION` - Region ID new carts are created in
//!   (default: the backend's first region)
//! - `MEDUSA_BACKEND_URL` - Commerce backend URL (default: <http://localhost:9000>)
//! - `MEDUSA_PUBLISHABLE_KEY` - Store API publishable key
//! - `VENDOR_PANEL_URL` - Vendor panel linked from the header
//!   (default: <http://localhost:7001>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use rigby_core::{Locale, RegionId};
use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "http://localhost:9000";
const DEFAULT_VENDOR_PANEL_URL: &str = "http://localhost:7001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Locale used for all price formatting
    pub locale: Locale,
    /// Region new carts are created in
    pub default_region: Option<RegionId>,
    /// Commerce backend configuration
    pub medusa: MedusaConfig,
    /// Vendor panel URL shown in the header
    pub vendor_panel_url: Url,
    /// Sentry configuration
    pub sentry: SentryConfig,
}

/// Medusa store API configuration.
#[derive(Debug, Clone)]
pub struct MedusaConfig {
    /// Backend root URL (the store API lives under `/store`)
    pub backend_url: Url,
    /// Publishable API key sent with every store request
    pub publishable_key: Option<String>,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parsed("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed("STOREFRONT_PORT", "8000")?;
        let base_url = parse_url("STOREFRONT_BASE_URL", &env.required("STOREFRONT_BASE_URL")?)?;
        let locale = env.parsed("STOREFRONT_LOCALE", Locale::default().tag())?;
        let default_region = env.optional("STOREFRONT_DEFAULT_REGION").map(RegionId::new);

        let medusa = MedusaConfig {
            backend_url: parse_url(
                "MEDUSA_BACKEND_URL",
                &env.or_default("MEDUSA_BACKEND_URL", DEFAULT_BACKEND_URL),
            )?,
            publishable_key: env.optional("MEDUSA_PUBLISHABLE_KEY"),
        };

        let vendor_panel_url = parse_url(
            "VENDOR_PANEL_URL",
            &env.or_default("VENDOR_PANEL_URL", DEFAULT_VENDOR_PANEL_URL),
        )?;

        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parsed("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            locale,
            default_region,
            medusa,
            vendor_panel_url,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOREFRONT_BASE_URL", "http://localhost:8000")]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.medusa.backend_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.vendor_panel_url.as_str(), "http://localhost:7001/");
        assert!(config.medusa.publishable_key.is_none());
        assert!(config.default_region.is_none());
        assert!(config.sentry.dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://shop.example"),
            ("MEDUSA_PUBLISHABLE_KEY", "  "),
        ])
        .unwrap();
        assert!(config.medusa.publishable_key.is_none());
        assert!(config.is_secure());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:8000"),
            ("STOREFRONT_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_locale() {
        let err = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:8000"),
            ("STOREFRONT_LOCALE", "tlh"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable STOREFRONT_LOCALE: unsupported locale: tlh"
        );
    }

    #[test]
    fn test_rejects_non_http_backend() {
        let err = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:8000"),
            ("MEDUSA_BACKEND_URL", "ftp://backend"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MEDUSA_BACKEND_URL"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:8000"),
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "3000"),
            ("STOREFRONT_LOCALE", "pl-PL"),
            ("STOREFRONT_DEFAULT_REGION", "reg_pl"),
            ("MEDUSA_PUBLISHABLE_KEY", "pk_01"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
        assert_eq!(config.locale, Locale::PlPl);
        assert_eq!(config.default_region, Some(RegionId::new("reg_pl")));
        assert_eq!(config.medusa.publishable_key.as_deref(), Some("pk_01"));
        assert!((config.sentry.traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }
}
