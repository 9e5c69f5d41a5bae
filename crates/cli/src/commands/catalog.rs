//! Catalog queries.
//!
//! # Usage
//!
//! ```bash
//! # List the second page of products
//! pocketshop catalog page 2
//!
//! # Show one product
//! pocketshop catalog product 5
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Base URL of the catalog API
//! - `PRODUCTS_PER_PAGE` - Default page size

use pocketshop_core::ProductId;
use pocketshop_storefront::catalog::CatalogApi;

use super::{CommandError, format_products};

/// Fetch one page of products.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn page<C: CatalogApi>(catalog: &C, page: u32, limit: u32) -> Result<String, CommandError> {
    tracing::info!(page, limit, "Fetching catalog page");
    let products = catalog.products(page, limit).await?;
    if products.is_empty() {
        return Ok(format!("Page {page} is empty"));
    }
    Ok(format_products(&products))
}

/// Fetch one product by id.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn product<C: CatalogApi>(catalog: &C, id: ProductId) -> Result<String, CommandError> {
    tracing::info!(%id, "Fetching product");
    let product = catalog.product(id).await?;
    Ok(format!("{}\n{}", format_products(std::slice::from_ref(&product)), product.image))
}
