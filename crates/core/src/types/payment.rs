//! Payment provider descriptors.
//!
//! Maps backend payment provider IDs to the title and icon shown during
//! checkout. Add a variant here to support another provider.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Icon drawn next to a payment option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentIcon {
    CreditCard,
    Ideal,
    Bancontact,
    PayPal,
}

impl PaymentIcon {
    /// Icon name as referenced by the static sprite sheet.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::Ideal => "ideal",
            Self::Bancontact => "bancontact",
            Self::PayPal => "paypal",
        }
    }
}

/// A payment provider the storefront knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentProvider {
    #[serde(rename = "stripe")]
    Stripe,
    #[serde(rename = "stripe-ideal")]
    StripeIdeal,
    #[serde(rename = "stripe-bancontact")]
    StripeBancontact,
    #[serde(rename = "paypal")]
    Paypal,
    #[serde(rename = "manual")]
    Manual,
}

/// Error returned for a provider ID with no descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment provider: {0}")]
pub struct UnknownProvider(pub String);

impl PaymentProvider {
    pub const ALL: [Self; 5] = [
        Self::Stripe,
        Self::StripeIdeal,
        Self::StripeBancontact,
        Self::Paypal,
        Self::Manual,
    ];

    /// Look up a provider by its backend ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Backend provider ID.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::StripeIdeal => "stripe-ideal",
            Self::StripeBancontact => "stripe-bancontact",
            Self::Paypal => "paypal",
            Self::Manual => "manual",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Stripe => "Credit card",
            Self::StripeIdeal => "iDeal",
            Self::StripeBancontact => "Bancontact",
            Self::Paypal => "PayPal",
            Self::Manual => "Test payment",
        }
    }

    #[must_use]
    pub const fn icon(self) -> PaymentIcon {
        match self {
            Self::Stripe | Self::Manual => PaymentIcon::CreditCard,
            Self::StripeIdeal => PaymentIcon::Ideal,
            Self::StripeBancontact => PaymentIcon::Bancontact,
            Self::Paypal => PaymentIcon::PayPal,
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PaymentProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Title and icon for any provider ID, known or not.
///
/// Unknown providers are shown by their raw ID with a card icon.
#[must_use]
pub fn describe_provider(id: &str) -> (String, PaymentIcon) {
    PaymentProvider::from_id(id).map_or_else(
        || (id.to_string(), PaymentIcon::CreditCard),
        |provider| (provider.title().to_string(), provider.icon()),
    )
}
