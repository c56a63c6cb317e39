//! Checkout step flow.
//!
//! The active step lives in the URL (`?step=delivery`) and is read on every
//! render; nothing here owns it. Each step's render mode is a pure function of
//! the cart's progress and the current step, and the only state a step keeps
//! is its request status ([`DeliveryState`]) for the lifetime of one render.

use core::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A checkout step, as carried in the `step` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Address,
    Delivery,
    Payment,
    Review,
}

/// Error returned for an unrecognised `step` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown checkout step: {0}")]
pub struct UnknownStep(pub String);

impl CheckoutStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Review => "review",
        }
    }

    /// Parse an optional query value; unknown or missing values mean no step.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| v.parse().ok())
    }

    /// Query string selecting this step (`?step=payment`).
    #[must_use]
    pub fn query(self) -> String {
        format!("?step={}", self.as_str())
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckoutStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(Self::Address),
            "delivery" => Ok(Self::Delivery),
            "payment" => Ok(Self::Payment),
            "review" => Ok(Self::Review),
            other => Err(UnknownStep(other.to_string())),
        }
    }
}

/// The parts of a cart snapshot the delivery step depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryProgress {
    pub item_count: usize,
    pub shipping_method_count: usize,
    pub has_shipping_address: bool,
    pub has_billing_address: bool,
    pub has_email: bool,
}

impl DeliveryProgress {
    /// Every line item has a shipping method.
    #[must_use]
    pub const fn can_continue(&self) -> bool {
        self.shipping_method_count == self.item_count
    }

    /// Addresses and email are in place, so the step may be edited.
    #[must_use]
    pub const fn has_contact_details(&self) -> bool {
        self.has_shipping_address && self.has_billing_address && self.has_email
    }
}

/// Whether the delivery step shows its form or a read-only summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Open,
    Summary,
}

/// Everything the delivery step template needs to decide what to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryView {
    pub mode: DeliveryMode,
    /// Heading greyed out: closed and nothing chosen yet.
    pub heading_dimmed: bool,
    /// Completed check mark next to the heading.
    pub show_check: bool,
    pub show_edit: bool,
    pub continue_enabled: bool,
}

impl DeliveryView {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.mode, DeliveryMode::Open)
    }
}

#[must_use]
pub fn delivery_mode(current_step: Option<CheckoutStep>) -> DeliveryMode {
    if matches!(current_step, Some(CheckoutStep::Delivery)) {
        DeliveryMode::Open
    } else {
        DeliveryMode::Summary
    }
}

/// Derive the delivery step's render decisions from cart progress and the
/// step named in the URL.
#[must_use]
pub fn delivery_view(progress: &DeliveryProgress, current_step: Option<CheckoutStep>) -> DeliveryView {
    let mode = delivery_mode(current_step);
    let closed = matches!(mode, DeliveryMode::Summary);
    DeliveryView {
        mode,
        heading_dimmed: closed && progress.shipping_method_count == 0,
        show_check: closed && progress.shipping_method_count > 0,
        show_edit: closed && progress.has_contact_details(),
        continue_enabled: progress.can_continue(),
    }
}

/// Shipping options offered for one line item's product.
///
/// An empty option list is read as "still loading" and rendered as a
/// spinner, never as "no options exist".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingChoices<T> {
    Pending,
    Available(Vec<T>),
}

impl<T> ShippingChoices<T> {
    #[must_use]
    pub fn from_options(options: Vec<T>) -> Self {
        if options.is_empty() {
            Self::Pending
        } else {
            Self::Available(options)
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The options, empty while pending.
    #[must_use]
    pub fn options(&self) -> &[T] {
        match self {
            Self::Pending => &[],
            Self::Available(options) => options,
        }
    }
}

/// Label above the summary list.
#[must_use]
pub const fn methods_label(count: usize) -> &'static str {
    if count > 1 { "Methods" } else { "Method" }
}

/// Refusal to leave the delivery step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("choose a shipping method for every item ({chosen} of {required} chosen)")]
pub struct DeliveryIncomplete {
    pub chosen: usize,
    pub required: usize,
}

/// Request status of the delivery step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryState {
    is_loading: bool,
    error: Option<String>,
    navigating_to: Option<CheckoutStep>,
    observed_mode: Option<DeliveryMode>,
}

impl DeliveryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Step a pending `advance` is navigating to.
    #[must_use]
    pub const fn navigating_to(&self) -> Option<CheckoutStep> {
        self.navigating_to
    }

    /// Record the mode this render is in. A change of mode clears the error,
    /// the loading flag and any pending navigation.
    pub fn observe_mode(&mut self, mode: DeliveryMode) {
        if self.observed_mode != Some(mode) {
            self.observed_mode = Some(mode);
            self.is_loading = false;
            self.error = None;
            self.navigating_to = None;
        }
    }

    pub const fn begin_request(&mut self) {
        self.is_loading = true;
    }

    pub const fn request_succeeded(&mut self) {
        self.is_loading = false;
    }

    /// Store the failure's display form and stop loading.
    pub fn request_failed(&mut self, error: &impl fmt::Display) {
        self.error = Some(error.to_string());
        self.is_loading = false;
    }

    /// Run a "set shipping method" request, tracking loading and error.
    ///
    /// Returns the request's value on success, `None` on failure.
    pub async fn track<T, E, F>(&mut self, request: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.begin_request();
        match request.await {
            Ok(value) => {
                self.request_succeeded();
                Some(value)
            }
            Err(e) => {
                self.request_failed(&e);
                None
            }
        }
    }

    /// Leave the delivery step for payment.
    ///
    /// Loading stays set until the next render observes the new mode.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryIncomplete`] if some line item has no shipping method.
    pub const fn advance(&mut self, progress: &DeliveryProgress) -> Result<CheckoutStep, DeliveryIncomplete> {
        if !progress.can_continue() {
            return Err(DeliveryIncomplete {
                chosen: progress.shipping_method_count,
                required: progress.item_count,
            });
        }
        self.is_loading = true;
        self.navigating_to = Some(CheckoutStep::Payment);
        Ok(CheckoutStep::Payment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn progress(items: usize, methods: usize) -> DeliveryProgress {
        DeliveryProgress {
            item_count: items,
            shipping_method_count: methods,
            has_shipping_address: true,
            has_billing_address: true,
            has_email: true,
        }
    }

    #[test]
    fn test_step_query_parsing() {
        assert_eq!(
            CheckoutStep::from_query(Some("delivery")),
            Some(CheckoutStep::Delivery)
        );
        assert_eq!(CheckoutStep::from_query(Some("shipping")), None);
        assert_eq!(CheckoutStep::from_query(None), None);
        assert_eq!(CheckoutStep::Payment.query(), "?step=payment");
    }

    #[test]
    fn test_mode_is_open_only_on_delivery_step() {
        assert_eq!(delivery_mode(Some(CheckoutStep::Delivery)), DeliveryMode::Open);
        assert_eq!(delivery_mode(Some(CheckoutStep::Payment)), DeliveryMode::Summary);
        assert_eq!(delivery_mode(None), DeliveryMode::Summary);
    }

    #[test]
    fn test_continue_enabled_iff_every_item_has_a_method() {
        for items in 0..4 {
            for methods in 0..4 {
                let view = delivery_view(&progress(items, methods), Some(CheckoutStep::Delivery));
                assert_eq!(view.continue_enabled, items == methods, "{items}/{methods}");
            }
        }
    }

    #[test]
    fn test_summary_header_decorations() {
        let empty = delivery_view(&progress(2, 0), Some(CheckoutStep::Payment));
        assert!(empty.heading_dimmed);
        assert!(!empty.show_check);

        let done = delivery_view(&progress(2, 2), Some(CheckoutStep::Payment));
        assert!(!done.heading_dimmed);
        assert!(done.show_check);
        assert!(done.show_edit);

        let open = delivery_view(&progress(2, 2), Some(CheckoutStep::Delivery));
        assert!(open.is_open());
        assert!(!open.show_check);
        assert!(!open.show_edit);
    }

    #[test]
    fn test_edit_requires_addresses_and_email() {
        let mut p = progress(1, 1);
        p.has_email = false;
        assert!(!delivery_view(&p, None).show_edit);
        p.has_email = true;
        p.has_billing_address = false;
        assert!(!delivery_view(&p, None).show_edit);
    }

    #[test]
    fn test_mode_change_resets_error_and_loading() {
        let mut state = DeliveryState::new();
        state.observe_mode(DeliveryMode::Open);
        state.begin_request();
        state.request_failed(&"boom");
        state.begin_request();
        assert!(state.is_loading());

        state.observe_mode(DeliveryMode::Summary);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);

        state.request_failed(&"again");
        state.observe_mode(DeliveryMode::Open);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_same_mode_keeps_state() {
        let mut state = DeliveryState::new();
        state.observe_mode(DeliveryMode::Open);
        state.request_failed(&"kept");
        state.observe_mode(DeliveryMode::Open);
        assert_eq!(state.error(), Some("kept"));
    }

    #[tokio::test]
    async fn test_successful_request_clears_loading_without_error() {
        let mut state = DeliveryState::new();
        let value = state.track(async { Ok::<_, String>(7) }).await;
        assert_eq!(value, Some(7));
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_rejected_request_stores_display_string() {
        let mut state = DeliveryState::new();
        let value: Option<()> = state
            .track(async { Err("Shipping option is not available for this item".to_string()) })
            .await;
        assert_eq!(value, None);
        assert!(!state.is_loading());
        assert_eq!(
            state.error(),
            Some("Shipping option is not available for this item")
        );
    }

    #[tokio::test]
    async fn test_loading_is_set_while_request_pending() {
        let (tx, rx) = tokio::sync::oneshot::channel::<Result<u8, String>>();
        let mut state = DeliveryState::new();

        // The backend never answers within the timeout; the tracked request
        // is dropped mid-flight.
        let in_flight = tokio::time::timeout(
            Duration::from_millis(20),
            state.track(async move { rx.await.unwrap_or_else(|e| Err(e.to_string())) }),
        )
        .await;
        assert!(in_flight.is_err());
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
        drop(tx);

        let value = state.track(async { Ok::<_, String>(3) }).await;
        assert_eq!(value, Some(3));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_track_resolves_once_backend_answers() {
        let (tx, rx) = tokio::sync::oneshot::channel::<Result<u8, String>>();
        let mut state = DeliveryState::new();

        let answer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            tx.send(Err("Shipping option is not available".to_string()))
        });

        let value = state
            .track(async move { rx.await.unwrap_or_else(|e| Err(e.to_string())) })
            .await;
        answer.await.unwrap().unwrap();

        assert_eq!(value, None);
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("Shipping option is not available"));
    }

    #[test]
    fn test_two_item_checkout_scenario() {
        let mut state = DeliveryState::new();
        state.observe_mode(DeliveryMode::Open);

        let none_chosen = progress(2, 0);
        assert!(!delivery_view(&none_chosen, Some(CheckoutStep::Delivery)).continue_enabled);
        assert_eq!(
            state.advance(&none_chosen),
            Err(DeliveryIncomplete {
                chosen: 0,
                required: 2
            })
        );
        assert!(!state.is_loading());

        let all_chosen = progress(2, 2);
        assert!(delivery_view(&all_chosen, Some(CheckoutStep::Delivery)).continue_enabled);
        assert_eq!(state.advance(&all_chosen), Ok(CheckoutStep::Payment));
        assert_eq!(CheckoutStep::Payment.query(), "?step=payment");
        assert!(state.is_loading());
        assert_eq!(state.navigating_to(), Some(CheckoutStep::Payment));

        // the payment render closes the delivery step
        state.observe_mode(delivery_mode(Some(CheckoutStep::Payment)));
        assert!(!state.is_loading());
        assert_eq!(state.navigating_to(), None);
    }

    #[test]
    fn test_empty_options_are_pending() {
        let choices: ShippingChoices<u8> = ShippingChoices::from_options(vec![]);
        assert!(choices.is_pending());
        assert!(choices.options().is_empty());

        let choices = ShippingChoices::from_options(vec![1, 2]);
        assert!(!choices.is_pending());
        assert_eq!(choices.options(), &[1, 2]);
    }

    #[test]
    fn test_methods_label() {
        assert_eq!(methods_label(1), "Method");
        assert_eq!(methods_label(2), "Methods");
    }
}
