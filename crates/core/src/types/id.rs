//! Newtype IDs for commerce backend entities.
//!
//! Medusa identifies every entity with a prefixed string (`cart_01H...`,
//! `item_01H...`, `so_01H...`). The `define_id!` macro wraps those strings so
//! a line item ID can never be passed where a shipping option ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use rigby_core::define_id;
/// define_id!(CartId);
/// define_id!(LineItemId);
///
/// let cart = CartId::new("cart_01");
/// let item = LineItemId::new("item_01");
///
/// // These are different types, so this won't compile:
/// // let _: CartId = item;
/// assert_eq!(cart.as_str(), "cart_01");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the raw identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(CartId);
define_id!(LineItemId);
define_id!(ProductId);
define_id!(VariantId);
define_id!(RegionId);
define_id!(ShippingOptionId);
define_id!(ShippingMethodId);
define_id!(OrderId);
