//! Display locales for currency formatting.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Non-breaking space.
const NBSP: &str = "\u{a0}";
/// Narrow non-breaking space (French digit grouping).
const NNBSP: &str = "\u{202f}";

/// Error returned when a locale tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$10.00`
    Prefix,
    /// `10,00 €`
    Suffix,
}

/// A supported display locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "pl-PL")]
    PlPl,
}

impl Locale {
    /// BCP 47 tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
            Self::PlPl => "pl-PL",
        }
    }

    #[must_use]
    pub const fn decimal_separator(self) -> &'static str {
        match self {
            Self::EnUs | Self::EnGb => ".",
            Self::DeDe | Self::FrFr | Self::PlPl => ",",
        }
    }

    #[must_use]
    pub const fn group_separator(self) -> &'static str {
        match self {
            Self::EnUs | Self::EnGb => ",",
            Self::DeDe => ".",
            Self::FrFr => NNBSP,
            Self::PlPl => NBSP,
        }
    }

    /// Minimum number of digits in the leading group before grouping kicks in.
    ///
    /// Polish leaves four-digit numbers ungrouped (`1000,00 zł`).
    #[must_use]
    pub const fn minimum_grouping_digits(self) -> usize {
        match self {
            Self::PlPl => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn symbol_position(self) -> SymbolPosition {
        match self {
            Self::EnUs | Self::EnGb => SymbolPosition::Prefix,
            Self::DeDe | Self::FrFr | Self::PlPl => SymbolPosition::Suffix,
        }
    }

    /// Separator between number and a suffixed symbol.
    #[must_use]
    pub const fn symbol_spacing(self) -> &'static str {
        NBSP
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().replace('_', "-").to_ascii_lowercase();
        match normalised.as_str() {
            "en-us" | "en" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "de-de" | "de" => Ok(Self::DeDe),
            "fr-fr" | "fr" => Ok(Self::FrFr),
            "pl-pl" | "pl" => Ok(Self::PlPl),
            _ => Err(LocaleError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::EnUs);
        assert_eq!("pl_PL".parse::<Locale>().unwrap(), Locale::PlPl);
        assert_eq!("DE".parse::<Locale>().unwrap(), Locale::DeDe);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "xx-YY".parse::<Locale>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported locale: xx-YY");
    }

    #[test]
    fn test_tag_roundtrips_through_display() {
        for locale in [
            Locale::EnUs,
            Locale::EnGb,
            Locale::DeDe,
            Locale::FrFr,
            Locale::PlPl,
        ] {
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), locale);
        }
    }
}
