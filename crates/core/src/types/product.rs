//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as listed by the catalog API.
///
/// Only the fields the storefront displays are kept; everything else in the
/// API payload (category, description, rating) is dropped on conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Absolute image URL.
    pub image: String,
}
