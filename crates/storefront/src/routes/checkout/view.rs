//! Checkout page view model.
//!
//! Built from a cart snapshot and the step named in the URL. Every checkout
//! action re-renders the whole `#checkout` container from one of these, since
//! opening one step closes the others.

use rigby_core::checkout::{
    CheckoutStep, DeliveryState, DeliveryView, ShippingChoices, delivery_view, methods_label,
};
use rigby_core::{PaymentIcon, PricingRegion, describe_provider, format_amount, summary_price};
use serde::Deserialize;

use crate::medusa::{Address, Cart, LineItem};

// =============================================================================
// Address
// =============================================================================

/// Shipping address form, as posted and as re-rendered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone: String,
}

impl AddressForm {
    /// Prefill from the cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        let address = cart.shipping_address.clone().unwrap_or_default();
        let field = |v: Option<String>| v.unwrap_or_default();
        Self {
            email: cart.email.clone().unwrap_or_default(),
            first_name: field(address.first_name),
            last_name: field(address.last_name),
            company: field(address.company),
            address_1: field(address.address_1),
            address_2: field(address.address_2),
            city: field(address.city),
            postal_code: field(address.postal_code),
            province: field(address.province),
            country_code: field(address.country_code),
            phone: field(address.phone),
        }
    }

    /// Names of required fields left blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("address", &self.address_1),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// The backend address. Blank optional fields are sent as absent.
    #[must_use]
    pub fn to_address(&self) -> Address {
        let field = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        Address {
            first_name: field(&self.first_name),
            last_name: field(&self.last_name),
            company: field(&self.company),
            address_1: field(&self.address_1),
            address_2: field(&self.address_2),
            city: field(&self.city),
            postal_code: field(&self.postal_code),
            province: field(&self.province),
            country_code: field(&self.country_code).map(|c| c.to_lowercase()),
            phone: field(&self.phone),
        }
    }
}

/// Printable lines of an address.
#[must_use]
pub fn address_lines(address: &Address) -> Vec<String> {
    let join = |parts: &[&Option<String>]| {
        parts
            .iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    [
        join(&[&address.first_name, &address.last_name]),
        join(&[&address.company]),
        join(&[&address.address_1, &address.address_2]),
        join(&[&address.postal_code, &address.city]),
        join(&[&address.province]),
        address
            .country_code
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_default(),
        join(&[&address.phone]),
    ]
    .into_iter()
    .filter(|line| !line.is_empty())
    .collect()
}

pub struct AddressSection {
    pub open: bool,
    pub done: bool,
    pub form: AddressForm,
    pub email: String,
    pub lines: Vec<String>,
    pub error: Option<String>,
}

// =============================================================================
// Delivery
// =============================================================================

pub struct ShippingOptionView {
    pub id: String,
    pub name: String,
    pub price: Option<String>,
    pub selected: bool,
}

/// Shipping choices for one line item.
pub struct DeliveryItemView {
    pub line_item_id: String,
    pub product_title: String,
    pub choices: ShippingChoices<ShippingOptionView>,
}

/// A chosen method in the collapsed summary.
pub struct ChosenMethodView {
    pub name: String,
    pub price: String,
}

pub struct DeliverySection {
    pub view: DeliveryView,
    pub is_loading: bool,
    pub error: Option<String>,
    pub items: Vec<DeliveryItemView>,
    pub methods: Vec<ChosenMethodView>,
    pub methods_label: &'static str,
}

impl DeliverySection {
    fn new(cart: &Cart, step: CheckoutStep, pricing: &PricingRegion, state: &DeliveryState) -> Self {
        let items = cart
            .items
            .iter()
            .map(|item| delivery_item(item, cart, pricing))
            .collect();
        let methods = cart
            .shipping_methods
            .iter()
            .map(|method| ChosenMethodView {
                name: method.shipping_option.name.clone(),
                price: summary_price(&format_amount(method.price, pricing, false), pricing.locale),
            })
            .collect();

        Self {
            view: delivery_view(&cart.delivery_progress(), Some(step)),
            is_loading: state.is_loading(),
            error: state.error().map(str::to_string),
            items,
            methods,
            methods_label: methods_label(cart.shipping_methods.len()),
        }
    }
}

fn delivery_item(item: &LineItem, cart: &Cart, pricing: &PricingRegion) -> DeliveryItemView {
    let options = item
        .shipping_options()
        .iter()
        .map(|option| ShippingOptionView {
            id: option.id.to_string(),
            name: option.name.clone(),
            price: option
                .amount
                .map(|amount| format_amount(amount, pricing, false)),
            selected: cart.has_method_for_option(&option.id),
        })
        .collect();

    DeliveryItemView {
        line_item_id: item.id.to_string(),
        product_title: item.product_title().to_string(),
        choices: ShippingChoices::from_options(options),
    }
}

// =============================================================================
// Payment and review
// =============================================================================

pub struct PaymentOptionView {
    pub id: String,
    pub title: String,
    pub icon: PaymentIcon,
    pub selected: bool,
}

pub struct PaymentSection {
    pub open: bool,
    pub done: bool,
    /// The delivery step is complete, so payment may be edited.
    pub editable: bool,
    pub options: Vec<PaymentOptionView>,
    pub selected: Option<PaymentOptionView>,
    pub error: Option<String>,
}

impl PaymentSection {
    fn new(cart: &Cart, step: CheckoutStep) -> Self {
        let selected_id = cart.selected_provider();
        let option = |id: &str| {
            let (title, icon) = describe_provider(id);
            PaymentOptionView {
                id: id.to_string(),
                title,
                icon,
                selected: selected_id == Some(id),
            }
        };
        let progress = cart.delivery_progress();

        Self {
            open: step == CheckoutStep::Payment,
            done: selected_id.is_some(),
            editable: progress.can_continue() && !cart.shipping_methods.is_empty(),
            options: cart
                .payment_sessions
                .iter()
                .map(|s| option(&s.provider_id))
                .collect(),
            selected: selected_id.map(option),
            error: None,
        }
    }
}

pub struct ReviewSection {
    pub open: bool,
    /// Everything is in place to place the order.
    pub ready: bool,
    pub error: Option<String>,
}

// =============================================================================
// Summary
// =============================================================================

pub struct SummaryLineView {
    pub title: String,
    pub quantity: u32,
    pub total: String,
}

pub struct SummaryView {
    pub lines: Vec<SummaryLineView>,
    pub subtotal: String,
    pub shipping: String,
    pub taxes: String,
    pub total: String,
}

impl SummaryView {
    fn new(cart: &Cart, pricing: &PricingRegion) -> Self {
        let amount = |v: Option<i64>| format_amount(v.unwrap_or(0), pricing, false);
        let subtotal = cart
            .subtotal
            .unwrap_or_else(|| LineItem::subtotal_of(&cart.items));
        Self {
            lines: cart
                .items
                .iter()
                .map(|item| SummaryLineView {
                    title: item.product_title().to_string(),
                    quantity: item.quantity,
                    total: format_amount(item.line_total(), pricing, false),
                })
                .collect(),
            subtotal: format_amount(subtotal, pricing, false),
            shipping: amount(cart.shipping_total),
            taxes: amount(cart.tax_total),
            total: amount(cart.total.or(Some(subtotal))),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Everything `checkout/container.html` renders.
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub address: AddressSection,
    pub delivery: DeliverySection,
    pub payment: PaymentSection,
    pub review: ReviewSection,
    pub summary: SummaryView,
}

impl CheckoutView {
    #[must_use]
    pub fn new(
        cart: &Cart,
        step: CheckoutStep,
        pricing: &PricingRegion,
        delivery: &DeliveryState,
    ) -> Self {
        let progress = cart.delivery_progress();
        let payment = PaymentSection::new(cart, step);
        let review_ready = progress.has_contact_details()
            && progress.can_continue()
            && !cart.shipping_methods.is_empty()
            && payment.done;

        Self {
            step,
            address: AddressSection {
                open: step == CheckoutStep::Address,
                done: progress.has_contact_details(),
                form: AddressForm::from_cart(cart),
                email: cart.email.clone().unwrap_or_default(),
                lines: cart
                    .shipping_address
                    .as_ref()
                    .map(address_lines)
                    .unwrap_or_default(),
                error: None,
            },
            delivery: DeliverySection::new(cart, step, pricing, delivery),
            payment,
            review: ReviewSection {
                open: step == CheckoutStep::Review,
                ready: review_ready,
                error: None,
            },
            summary: SummaryView::new(cart, pricing),
        }
    }

    /// Re-show a rejected address form with its message.
    #[must_use]
    pub fn with_address_error(mut self, form: AddressForm, error: impl Into<String>) -> Self {
        self.address.form = form;
        self.address.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_payment_error(mut self, error: impl Into<String>) -> Self {
        self.payment.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_review_error(mut self, error: impl Into<String>) -> Self {
        self.review.error = Some(error.into());
        self
    }
}

/// Step to show when the URL names none: the first one left to do.
#[must_use]
pub fn default_step(cart: &Cart) -> CheckoutStep {
    let progress = cart.delivery_progress();
    if !progress.has_contact_details() {
        CheckoutStep::Address
    } else if !progress.can_continue() || cart.shipping_methods.is_empty() {
        CheckoutStep::Delivery
    } else if cart.selected_provider().is_none() {
        CheckoutStep::Payment
    } else {
        CheckoutStep::Review
    }
}
