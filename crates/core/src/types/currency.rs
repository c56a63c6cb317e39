//! ISO 4217 currency codes as the commerce backend reports them.
//!
//! Medusa stores every amount as an integer in the currency's smallest stored
//! unit. For most currencies that unit is a cent-like subdivision, but for the
//! currencies in [`NO_DIVISION_CURRENCIES`] the stored integer already equals
//! one display unit and must not be divided by 100.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Currencies whose stored amounts are already whole display units.
///
/// Add currencies here that don't need to be divided by 100.
pub const NO_DIVISION_CURRENCIES: &[&str] = &[
    "krw", "jpy", "vnd", "clp", "pyg", "xaf", "xof", "bif", "djf", "gnf", "kmf", "mga", "rwf",
    "xpf", "htg", "vuv", "xag", "xdr", "xau",
];

/// A currency code, normalised to lower case.
///
/// Construction never fails: the backend is the source of truth for which
/// codes exist, and unknown codes still format (see
/// [`crate::price::convert_to_locale`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a currency code from any casing, trimming whitespace.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_lowercase())
    }

    /// The lower-case code (`"usd"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The upper-case code used for display (`"USD"`).
    #[must_use]
    pub fn to_upper(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    /// True when no code was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when stored amounts are whole units (no division by 100).
    #[must_use]
    pub fn is_zero_decimal(&self) -> bool {
        NO_DIVISION_CURRENCIES.contains(&self.0.as_str())
    }

    /// Divisor applied to stored integer amounts before display.
    #[must_use]
    pub fn divisor(&self) -> i64 {
        if self.is_zero_decimal() { 1 } else { 100 }
    }

    /// Number of fraction digits shown by default.
    #[must_use]
    pub fn minor_units(&self) -> u32 {
        if self.is_zero_decimal() { 0 } else { 2 }
    }

    /// Display symbol, if the currency has a well-known one.
    ///
    /// Currencies without an entry are displayed by their upper-case code.
    #[must_use]
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self.0.as_str() {
            "usd" => "$",
            "eur" => "€",
            "gbp" => "£",
            "jpy" => "¥",
            "krw" => "₩",
            "vnd" => "₫",
            "inr" => "₹",
            "ils" => "₪",
            "pln" => "zł",
            "cad" => "CA$",
            "aud" => "A$",
            "nzd" => "NZ$",
            "mxn" => "MX$",
            "brl" => "R$",
            "chf" => "CHF",
            "sek" | "nok" => "kr",
            "dkk" => "kr.",
            "xaf" => "FCFA",
            "xof" => "F\u{202f}CFA",
            "xpf" => "CFPF",
            _ => return None,
        };
        Some(symbol)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalises_case() {
        assert_eq!(CurrencyCode::new(" JPY ").as_str(), "jpy");
        assert_eq!(CurrencyCode::new("usd").to_upper(), "USD");
    }

    #[test]
    fn test_every_listed_currency_is_zero_decimal() {
        for code in NO_DIVISION_CURRENCIES {
            let currency = CurrencyCode::new(&code.to_ascii_uppercase());
            assert!(currency.is_zero_decimal(), "{code} should not divide");
            assert_eq!(currency.divisor(), 1);
            assert_eq!(currency.minor_units(), 0);
        }
    }

    #[test]
    fn test_standard_currencies_divide_by_100() {
        for code in ["usd", "eur", "gbp", "pln", "dkk"] {
            let currency = CurrencyCode::new(code);
            assert!(!currency.is_zero_decimal());
            assert_eq!(currency.divisor(), 100);
            assert_eq!(currency.minor_units(), 2);
        }
    }

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(CurrencyCode::new("usd").symbol(), Some("$"));
        assert_eq!(CurrencyCode::new("eur").symbol(), Some("€"));
        assert_eq!(CurrencyCode::new("clp").symbol(), None);
    }

    #[test]
    fn test_serde_normalises() {
        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code.as_str(), "eur");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"eur\"");
    }
}
