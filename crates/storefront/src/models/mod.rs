//! Storefront-local models.
//!
//! The storefront keeps no database; the only local state is what lives in
//! the shopper's session.

pub mod session;

pub use session::keys as session_keys;
