//! Medusa store API response bodies.
//!
//! One cart, `cart_1`, in a USD region with two line items: a mug whose
//! product ships "Standard" ($10.00) or "Express" ($25.00), and a poster
//! that ships "Standard" only.

use serde_json::{Value, json};

pub const CART_ID: &str = "cart_1";
pub const MUG_ITEM: &str = "item_mug";
pub const POSTER_ITEM: &str = "item_poster";
pub const STANDARD: &str = "so_standard";
pub const EXPRESS: &str = "so_express";

#[must_use]
pub fn region() -> Value {
    json!({ "id": "reg_us", "name": "United States", "currency_code": "usd", "tax_rate": 0 })
}

#[must_use]
pub fn regions_body() -> Value {
    json!({ "regions": [region()] })
}

fn shipping_option(id: &str) -> Value {
    match id {
        EXPRESS => json!({ "id": EXPRESS, "name": "Express", "amount": 2500 }),
        _ => json!({ "id": STANDARD, "name": "Standard", "amount": 1000 }),
    }
}

fn line_item(id: &str, title: &str, unit_price: i64, options: &[&str]) -> Value {
    let handle = title.to_lowercase();
    json!({
        "id": id,
        "title": title,
        "quantity": 1,
        "unit_price": unit_price,
        "variant": {
            "id": format!("variant_{handle}"),
            "title": "Default Variant",
            "product": {
                "id": format!("prod_{handle}"),
                "title": title,
                "handle": handle,
                "shipping_options": options.iter().map(|o| shipping_option(o)).collect::<Vec<_>>(),
            }
        }
    })
}

fn address() -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "address_1": "1 Main St",
        "city": "Springfield",
        "postal_code": "12345",
        "country_code": "us"
    })
}

/// Builder for the cart as the backend currently sees it.
#[derive(Debug, Clone, Default)]
pub struct CartFixture {
    /// `(line item, shipping option)` pairs chosen so far.
    pub methods: Vec<(&'static str, &'static str)>,
    pub with_contact: bool,
    pub payment_providers: Vec<&'static str>,
    pub selected_provider: Option<&'static str>,
}

impl CartFixture {
    /// Two items, addresses and email filled in, nothing chosen.
    #[must_use]
    pub fn ready_for_delivery() -> Self {
        Self {
            with_contact: true,
            payment_providers: vec!["manual"],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_method(mut self, item: &'static str, option: &'static str) -> Self {
        self.methods.push((item, option));
        self
    }

    #[must_use]
    pub fn with_selected_provider(mut self, provider: &'static str) -> Self {
        self.selected_provider = Some(provider);
        self
    }

    /// The cart object.
    #[must_use]
    pub fn cart(&self) -> Value {
        let methods: Vec<Value> = self
            .methods
            .iter()
            .enumerate()
            .map(|(i, (item, option))| {
                let option_json = shipping_option(option);
                json!({
                    "id": format!("sm_{i}"),
                    "shipping_option_id": option_json["id"],
                    "shipping_option": { "id": option_json["id"], "name": option_json["name"] },
                    "price": option_json["amount"],
                    "data": { "line_item_id": item }
                })
            })
            .collect();
        let shipping_total: i64 = methods.iter().filter_map(|m| m["price"].as_i64()).sum();
        let sessions: Vec<Value> = self
            .payment_providers
            .iter()
            .map(|p| json!({ "provider_id": p, "is_selected": self.selected_provider == Some(*p) }))
            .collect();

        let mut cart = json!({
            "id": CART_ID,
            "region": region(),
            "items": [
                line_item(MUG_ITEM, "Mug", 1500, &[STANDARD, EXPRESS]),
                line_item(POSTER_ITEM, "Poster", 900, &[STANDARD]),
            ],
            "shipping_methods": methods,
            "payment_sessions": sessions,
            "subtotal": 2400,
            "shipping_total": shipping_total,
            "tax_total": 0,
            "total": 2400 + shipping_total
        });
        if self.with_contact {
            cart["email"] = json!("ada@shop.example");
            cart["shipping_address"] = address();
            cart["billing_address"] = address();
        }
        cart
    }

    /// `{ "cart": .. }` response body.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({ "cart": self.cart() })
    }
}

/// Body of a completed cart that became an order.
#[must_use]
pub fn completed_order_body() -> Value {
    json!({
        "type": "order",
        "data": order()
    })
}

#[must_use]
pub fn order() -> Value {
    json!({
        "id": "order_1",
        "display_id": 1001,
        "email": "ada@shop.example",
        "currency_code": "usd",
        "items": [
            { "id": MUG_ITEM, "title": "Mug", "quantity": 1, "unit_price": 1500 },
            { "id": POSTER_ITEM, "title": "Poster", "quantity": 1, "unit_price": 900 }
        ],
        "shipping_address": address(),
        "shipping_methods": [{
            "id": "sm_0", "shipping_option_id": STANDARD, "price": 1000,
            "shipping_option": { "id": STANDARD, "name": "Standard" }
        }],
        "subtotal": 2400,
        "shipping_total": 2000,
        "tax_total": 0,
        "total": 4400
    })
}
