//! Amount formatting for stored integer prices.
//!
//! The backend reports every amount in the smallest stored unit of the
//! region's currency. Formatting is two steps:
//!
//! 1. [`compute_amount`] turns the stored integer into a display decimal,
//!    dividing by 100 unless the currency is zero-decimal and optionally
//!    applying the region's tax rate.
//! 2. [`convert_to_locale`] renders that decimal with the locale's separators
//!    and the currency's symbol.
//!
//! ```rust
//! use rigby_core::{CurrencyCode, PricingRegion, format_amount};
//!
//! let usd = PricingRegion::new(CurrencyCode::new("usd"));
//! assert_eq!(format_amount(1000, &usd, false), "$10.00");
//!
//! let jpy = PricingRegion::new(CurrencyCode::new("jpy"));
//! assert_eq!(format_amount(1000, &jpy, false), "¥1,000");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;
use super::locale::{Locale, SymbolPosition};

/// Pricing context of a region: what currency amounts are in, how much tax
/// applies, and which locale renders them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricingRegion {
    pub currency_code: CurrencyCode,
    /// Tax rate in percent (`23` for 23%). `None` means untaxed.
    pub tax_rate: Option<Decimal>,
    pub locale: Locale,
}

impl PricingRegion {
    /// An untaxed region in the default locale.
    #[must_use]
    pub fn new(currency_code: CurrencyCode) -> Self {
        Self {
            currency_code,
            tax_rate: None,
            locale: Locale::default(),
        }
    }

    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Overrides for [`convert_to_locale`].
///
/// Unset fraction digit bounds default to the currency's minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub locale: Locale,
    pub minimum_fraction_digits: Option<u32>,
    pub maximum_fraction_digits: Option<u32>,
}

impl FormatOptions {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
        }
    }

    /// Resolve `(min, max)` fraction digits; `max` is never below `min`.
    fn fraction_digits(&self, currency_default: u32) -> (u32, u32) {
        match (self.minimum_fraction_digits, self.maximum_fraction_digits) {
            (Some(min), Some(max)) => (min, max.max(min)),
            (Some(min), None) => (min, currency_default.max(min)),
            (None, Some(max)) => (currency_default.min(max), max),
            (None, None) => (currency_default, currency_default),
        }
    }
}

/// Convert a stored integer amount to display units.
#[must_use]
pub fn convert_to_decimal(amount: i64, currency: &CurrencyCode) -> Decimal {
    Decimal::from(amount) / Decimal::from(currency.divisor())
}

/// Region tax rate as a fraction (`0.23` for 23%), zero when absent.
#[must_use]
pub fn tax_rate(region: &PricingRegion) -> Decimal {
    region
        .tax_rate
        .map_or(Decimal::ZERO, |rate| rate / Decimal::ONE_HUNDRED)
}

/// Display-unit amount, including tax when requested.
#[must_use]
pub fn compute_amount(amount: i64, region: &PricingRegion, include_taxes: bool) -> Decimal {
    let to_decimal = convert_to_decimal(amount, &region.currency_code);
    let rate = if include_taxes {
        tax_rate(region)
    } else {
        Decimal::ZERO
    };
    to_decimal * (Decimal::ONE + rate)
}

/// Render a display-unit amount as a localized currency string.
///
/// An empty currency code yields the bare number with no grouping. A code
/// without a known symbol is rendered by its upper-case code.
#[must_use]
pub fn convert_to_locale(amount: Decimal, currency: &CurrencyCode, options: FormatOptions) -> String {
    if currency.is_empty() {
        return amount.normalize().to_string();
    }

    let locale = options.locale;
    let (min_digits, max_digits) = options.fraction_digits(currency.minor_units());

    let mut rounded = amount.round_dp_with_strategy(max_digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(max_digits);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let number = render_digits(rounded.mantissa().unsigned_abs(), min_digits, max_digits, locale);

    let code;
    let symbol = if let Some(symbol) = currency.symbol() {
        symbol
    } else {
        code = currency.to_upper();
        code.as_str()
    };

    let sign = if negative { "-" } else { "" };
    match locale.symbol_position() {
        SymbolPosition::Prefix => {
            let spacing = if symbol.ends_with(char::is_alphabetic) {
                locale.symbol_spacing()
            } else {
                ""
            };
            format!("{sign}{symbol}{spacing}{number}")
        }
        SymbolPosition::Suffix => {
            format!("{sign}{number}{}{symbol}", locale.symbol_spacing())
        }
    }
}

/// Format a stored integer amount for a region.
#[must_use]
pub fn format_amount(amount: i64, region: &PricingRegion, include_taxes: bool) -> String {
    let display = compute_amount(amount, region, include_taxes);
    convert_to_locale(display, &region.currency_code, FormatOptions::new(region.locale))
}

/// Normalise a price formatted in `locale` for the delivery summary.
///
/// The locale's digit grouping is dropped and its decimal mark becomes a
/// comma (`$1,234.50` → `$1234,50`, `1.234,56 €` → `1234,56 €`). Only
/// separators between two digits are touched, so symbol spacing survives.
#[must_use]
pub fn summary_price(formatted: &str, locale: Locale) -> String {
    let is = |separator: &str, ch: char| separator.chars().eq(std::iter::once(ch));
    let chars: Vec<char> = formatted.chars().collect();
    let mut out = String::with_capacity(formatted.len());

    for (i, &ch) in chars.iter().enumerate() {
        let digit_before = i
            .checked_sub(1)
            .and_then(|j| chars.get(j))
            .is_some_and(char::is_ascii_digit);
        let digit_after = chars.get(i + 1).is_some_and(char::is_ascii_digit);

        if digit_before && digit_after {
            if is(locale.group_separator(), ch) {
                continue;
            }
            if is(locale.decimal_separator(), ch) {
                out.push(',');
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Lay out an unsigned scaled integer (`mantissa` with `max_digits` implied
/// decimals) using the locale's separators.
fn render_digits(mantissa: u128, min_digits: u32, max_digits: u32, locale: Locale) -> String {
    let scale = max_digits as usize;
    let mut digits = mantissa.to_string();
    if digits.len() <= scale {
        digits = format!("{}{digits}", "0".repeat(scale + 1 - digits.len()));
    }

    let (int_part, frac_part) = digits.split_at(digits.len() - scale);

    let mut fraction = frac_part.to_string();
    while fraction.len() > min_digits as usize && fraction.ends_with('0') {
        fraction.pop();
    }

    let grouped = group_integer(int_part, locale);
    if fraction.is_empty() {
        grouped
    } else {
        format!("{grouped}{}{fraction}", locale.decimal_separator())
    }
}

fn group_integer(int_part: &str, locale: Locale) -> String {
    if int_part.len() < 3 + locale.minimum_grouping_digits() {
        return int_part.to_string();
    }

    let separator = locale.group_separator();
    let lead = int_part.len() % 3;
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 * separator.len());
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
