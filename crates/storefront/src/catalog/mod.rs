//! Remote product catalog.
//!
//! # Architecture
//!
//! - [`CatalogApi`] is the seam the loader and cart manager depend on
//! - [`CatalogClient`] implements it over HTTP with `reqwest`
//! - The catalog is the source of truth - NO caching, every call hits the API
//!
//! # Endpoints
//!
//! - `GET {base}/products?limit={n}&page={p}` - one page of products
//! - `GET {base}/products/{id}` - a single product
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketshop_storefront::catalog::{CatalogApi, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let page = client.products(1, 10).await?;
//! let product = client.product(page[0].id).await?;
//! ```

mod client;
mod conversions;

pub use client::CatalogClient;

use std::future::Future;

use pocketshop_core::{Product, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The products endpoint could not be derived from the base URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API answered successfully but with no product.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Read-only access to the product catalog.
///
/// Futures are `Send` so calls can run as independent tasks while the widget
/// keeps handling events.
pub trait CatalogApi: Send + Sync + 'static {
    /// Fetch one page of products. Paging semantics belong to the API.
    fn products(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch a single product's detail.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
