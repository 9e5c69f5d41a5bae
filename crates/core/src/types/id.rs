//! Product identifiers.
//!
//! The catalog API hands out numeric ids, while rendered triggers carry the id
//! as a `data-product-id` attribute string. Both sides go through [`ProductId`]
//! so that `"5"` from a button and `5` from a JSON payload compare equal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type-safe identifier of a catalog product.
///
/// # Example
///
/// ```rust
/// # use pocketshop_core::ProductId;
/// let from_api = ProductId::new(5);
/// let from_button: ProductId = "5".parse().unwrap();
///
/// assert_eq!(from_api, from_button);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new ID from a u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying u32 value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A trigger attribute that does not hold a product id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product id: {0:?}")]
pub struct ParseProductIdError(String);

impl FromStr for ProductId {
    type Err = ParseProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseProductIdError(s.to_string()))
    }
}
