use proptest::prelude::*;
use rigby_core::checkout::{CheckoutStep, DeliveryMode, DeliveryProgress, DeliveryState, delivery_view};
use rigby_core::{CurrencyCode, NO_DIVISION_CURRENCIES, PricingRegion, format_amount};

/// Group an unsigned integer the en-US way (`1234567` -> `1,234,567`).
fn en_us_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

proptest! {
    #[test]
    fn zero_decimal_currencies_render_the_raw_integer(
        index in 0..NO_DIVISION_CURRENCIES.len(),
        amount in 0_i64..10_000_000_000,
    ) {
        let code = CurrencyCode::new(NO_DIVISION_CURRENCIES[index]);
        let formatted = format_amount(amount, &PricingRegion::new(code), false);
        let expected = en_us_grouped(amount.unsigned_abs());
        prop_assert!(formatted.ends_with(&expected), "{formatted} vs {expected}");
        prop_assert!(!formatted.contains('.'));
    }

    #[test]
    fn standard_currencies_render_hundredths(amount in 0_i64..10_000_000_000) {
        let formatted = format_amount(amount, &PricingRegion::new(CurrencyCode::new("usd")), false);
        let units = amount.unsigned_abs() / 100;
        let cents = amount.unsigned_abs() % 100;
        prop_assert_eq!(formatted, format!("${}.{cents:02}", en_us_grouped(units)));
    }

    #[test]
    fn continue_enabled_iff_counts_match(items in 0_usize..20, methods in 0_usize..20) {
        let progress = DeliveryProgress {
            item_count: items,
            shipping_method_count: methods,
            ..DeliveryProgress::default()
        };
        let view = delivery_view(&progress, Some(CheckoutStep::Delivery));
        prop_assert_eq!(view.continue_enabled, items == methods);
    }

    #[test]
    fn toggling_mode_always_resets(error in ".{0,40}", loading in any::<bool>(), start_open in any::<bool>()) {
        let (first, second) = if start_open {
            (DeliveryMode::Open, DeliveryMode::Summary)
        } else {
            (DeliveryMode::Summary, DeliveryMode::Open)
        };
        let mut state = DeliveryState::new();
        state.observe_mode(first);
        state.request_failed(&error);
        if loading {
            state.begin_request();
        }

        state.observe_mode(second);
        prop_assert!(!state.is_loading());
        prop_assert_eq!(state.error(), None);
    }
}
