//! The shopping cart.
//!
//! A [`Cart`] is an insertion-ordered list of [`CartItem`]s holding at most one
//! line per [`ProductId`]. Adding a product that is already present bumps that
//! line's quantity; there is no partial decrement, removal drops the whole line.
//!
//! # Totals
//!
//! [`CartTotals`] counts line items and sums unit prices per line. Quantity does
//! not participate in either figure: two units of a `$5.00` product still report
//! one item and `$5.00`.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// A product in the cart together with how many times it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1. Snapshots without the field restore as 1.
    #[serde(default)]
    pub quantity: u32,
}

impl CartItem {
    /// Create a new line with quantity 1.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Inserted,
    /// An existing line's quantity was incremented to the contained value.
    Incremented(u32),
}

/// Line-item aggregates shown in the cart footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Number of line items.
    pub total_items: usize,
    /// Sum of unit prices across line items.
    pub total_price: Price,
}

/// Ordered collection of cart lines, one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from previously stored lines.
    ///
    /// Lines sharing an id are merged into the first occurrence (quantities
    /// summed) and zero quantities are raised to 1, so a snapshot written by an
    /// older build cannot break the one-line-per-product invariant.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            item.quantity = item.quantity.max(1);
            match cart.get_mut(item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: Product) -> AddOutcome {
        if let Some(existing) = self.get_mut(product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return AddOutcome::Incremented(existing.quantity);
        }
        self.items.push(CartItem::new(product));
        AddOutcome::Inserted
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Product ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    /// Number of line items (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Footer aggregates, one count and one unit price per line.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_items: self.items.len(),
            total_price: self.items.iter().map(|item| item.price).sum(),
        }
    }
}
