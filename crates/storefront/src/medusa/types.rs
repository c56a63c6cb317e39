//! Domain types for the Medusa store API.
//!
//! Field names follow the backend's JSON. Amounts are integers in the
//! region currency's smallest stored unit; format them with
//! [`rigby_core::format_amount`].

use rigby_core::checkout::DeliveryProgress;
use rigby_core::{
    CartId, CurrencyCode, LineItemId, Locale, OrderId, PricingRegion, ProductId, RegionId,
    ShippingMethodId, ShippingOptionId, VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Region
// =============================================================================

/// A sales region: fixes the currency and tax rate for carts created in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub currency_code: CurrencyCode,
    /// Tax rate in percent.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}

impl Region {
    /// Pricing context for amounts in this region.
    #[must_use]
    pub fn pricing(&self, locale: Locale) -> PricingRegion {
        PricingRegion {
            currency_code: self.currency_code.clone(),
            tax_rate: self.tax_rate,
            locale,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A delivery method offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: ShippingOptionId,
    pub name: String,
    #[serde(default)]
    pub amount: Option<i64>,
}

/// A variant price in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub amount: i64,
    pub currency_code: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    #[serde(default)]
    pub prices: Vec<MoneyAmount>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub allow_backorder: bool,
    #[serde(default)]
    pub manage_inventory: bool,
}

impl ProductVariant {
    /// Price of this variant in a currency, if one is set.
    #[must_use]
    pub fn price_in(&self, currency: &CurrencyCode) -> Option<i64> {
        self.prices
            .iter()
            .find(|p| &p.currency_code == currency)
            .map(|p| p.amount)
    }

    /// Whether the variant can be added to a cart.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        !self.manage_inventory || self.allow_backorder || self.inventory_quantity.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Shipping options available for this product.
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
}

impl Product {
    /// Cheapest variant price in a currency.
    #[must_use]
    pub fn cheapest_price(&self, currency: &CurrencyCode) -> Option<i64> {
        self.variants.iter().filter_map(|v| v.price_in(currency)).min()
    }
}

/// One page of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The variant behind a line item, with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemVariant {
    pub id: VariantId,
    #[serde(default)]
    pub title: Option<String>,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub variant: Option<LineItemVariant>,
}

impl LineItem {
    /// Shipping options of the item's product; empty when the backend has
    /// not attached any (yet).
    #[must_use]
    pub fn shipping_options(&self) -> &[ShippingOption] {
        self.variant
            .as_ref()
            .map(|v| v.product.shipping_options.as_slice())
            .unwrap_or_default()
    }

    /// Product title, falling back to the line item's own title.
    #[must_use]
    pub fn product_title(&self) -> &str {
        self.variant
            .as_ref()
            .map_or(self.title.as_str(), |v| v.product.title.as_str())
    }

    /// Line total, computed from unit price when the backend omits it.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.total
            .unwrap_or_else(|| self.unit_price.saturating_mul(i64::from(self.quantity)))
    }

    /// Sum of line totals, saturating like [`Self::line_total`].
    #[must_use]
    pub fn subtotal_of(items: &[Self]) -> i64 {
        items.iter().map(Self::line_total).fold(0, i64::saturating_add)
    }
}

/// Reference to the option a shipping method was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOptionRef {
    pub id: ShippingOptionId,
    pub name: String,
}

/// A shipping option chosen for a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub shipping_option_id: ShippingOptionId,
    pub shipping_option: ShippingOptionRef,
    pub price: i64,
    #[serde(default)]
    pub data: ShippingMethodData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethodData {
    #[serde(default)]
    pub line_item_id: Option<LineItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub provider_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_selected: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub region: Region,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
    #[serde(default)]
    pub payment_sessions: Vec<PaymentSession>,
    #[serde(default)]
    pub payment_session: Option<PaymentSession>,
    #[serde(default)]
    pub subtotal: Option<i64>,
    #[serde(default)]
    pub shipping_total: Option<i64>,
    #[serde(default)]
    pub tax_total: Option<i64>,
    #[serde(default)]
    pub discount_total: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

impl Cart {
    /// Snapshot of the fields the delivery step renders from.
    #[must_use]
    pub fn delivery_progress(&self) -> DeliveryProgress {
        DeliveryProgress {
            item_count: self.items.len(),
            shipping_method_count: self.shipping_methods.len(),
            has_shipping_address: self.shipping_address.is_some(),
            has_billing_address: self.billing_address.is_some(),
            has_email: self.email.as_deref().is_some_and(|e| !e.is_empty()),
        }
    }

    /// Whether any shipping method was created from this option.
    #[must_use]
    pub fn has_method_for_option(&self, option_id: &ShippingOptionId) -> bool {
        self.shipping_methods
            .iter()
            .any(|m| &m.shipping_option.id == option_id)
    }

    /// Total number of units across line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Provider of the selected payment session.
    #[must_use]
    pub fn selected_provider(&self) -> Option<&str> {
        self.payment_session
            .as_ref()
            .map(|s| s.provider_id.as_str())
            .or_else(|| {
                self.payment_sessions
                    .iter()
                    .find(|s| s.is_selected == Some(true))
                    .map(|s| s.provider_id.as_str())
            })
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub display_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
    #[serde(default)]
    pub subtotal: Option<i64>,
    #[serde(default)]
    pub shipping_total: Option<i64>,
    #[serde(default)]
    pub tax_total: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// Outcome of completing a cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum CompletedCart {
    /// The cart became an order.
    Order(Box<Order>),
    /// Completion did not go through (e.g. payment requires more action).
    Cart(Box<Cart>),
    /// The cart completed a swap.
    Swap(serde_json::Value),
}

// =============================================================================
// Inputs
// =============================================================================

/// Fields updated on a cart during the address step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
}
