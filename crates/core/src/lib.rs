//! Pocketshop Core - Shared types library.
//!
//! This crate provides the domain types used across all Pocketshop components:
//! - `storefront` - Catalog loader, cart manager and the widget event loop
//! - `cli` - One-shot command-line access to the catalog and the stored cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and deterministic to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, the product record
//! - [`cart`] - The cart, its line items and derived totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{AddOutcome, Cart, CartItem, CartTotals};
pub use types::*;
