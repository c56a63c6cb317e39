//! Rigby Core - Shared storefront types.
//!
//! This crate provides the rules the storefront renders with:
//! - [`types`] - Backend IDs, currencies, locales, amount formatting,
//!   payment provider descriptors and the checkout contact email
//! - [`checkout`] - Checkout steps and the delivery step's render rules
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The storefront binary feeds it snapshots from the commerce
//! backend and renders what it returns.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod types;

pub use types::*;
