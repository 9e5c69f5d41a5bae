//! Catalog payload conversions.

use pocketshop_core::{Price, Product, ProductId};
use serde::Deserialize;

/// A product as serialized by the catalog API.
///
/// Unknown fields (description, category, rating) are ignored.
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            price: record.price,
            image: record.image,
        }
    }
}
