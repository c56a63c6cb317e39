//! Core types for the storefront.

pub mod currency;
pub mod email;
pub mod id;
pub mod locale;
pub mod payment;
pub mod price;

pub use currency::{CurrencyCode, NO_DIVISION_CURRENCIES};
pub use email::{ContactEmail, EmailError};
pub use id::*;
pub use locale::{Locale, LocaleError, SymbolPosition};
pub use payment::{PaymentIcon, PaymentProvider, UnknownProvider, describe_provider};
pub use price::{
    FormatOptions, PricingRegion, compute_amount, convert_to_decimal, convert_to_locale,
    format_amount, summary_price, tax_rate,
};
