//! Core types for Pocketshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ParseProductIdError, ProductId};
pub use price::Price;
pub use product::Product;
