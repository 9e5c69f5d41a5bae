//! CLI command implementations.
//!
//! Each command returns the text to print; `main` does the printing.

pub mod cart;
pub mod catalog;

use pocketshop_core::{Cart, Product, ProductId};
use pocketshop_storefront::catalog::CatalogError;
use pocketshop_storefront::config::ConfigError;
use pocketshop_storefront::error::WidgetError;
use pocketshop_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation failed.
    #[error(transparent)]
    Widget(#[from] WidgetError),

    /// The catalog has no product with this id.
    #[error("Product {0} could not be fetched")]
    ProductUnavailable(ProductId),
}

/// One line per product: id, price and title.
fn format_products(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("{:>6}  {:>10}  {}", p.id, p.price.display(), p.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cart lines followed by the totals footer.
fn format_cart(cart: &Cart) -> String {
    let totals = cart.totals();
    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{:>6}  {:>10}  x{:<3} {}",
                item.id,
                item.price.display(),
                item.quantity,
                item.title
            )
        })
        .collect();
    if lines.is_empty() {
        lines.push("Cart is empty".to_string());
    }
    lines.push(format!(
        "Total Items: {}  Total Price: {}",
        totals.total_items,
        totals.total_price.display()
    ));
    lines.join("\n")
}
