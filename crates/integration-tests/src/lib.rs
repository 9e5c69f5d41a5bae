//! Integration tests for Pocketshop.
//!
//! The catalog API is served by a [`wiremock`] server and the cart is
//! persisted to a temporary directory, so the tests need no network and no
//! setup.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - HTTP client against the mocked API
//! - `storefront_flow` - Widget scenarios end to end

use std::ops::RangeInclusive;
use std::sync::Arc;

use pocketshop_storefront::catalog::CatalogClient;
use pocketshop_storefront::config::{CatalogConfig, PagingConfig};
use pocketshop_storefront::storage::FileStore;
use pocketshop_storefront::surface::ScrollMetrics;
use pocketshop_storefront::widget::{Event, Storefront};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The widget wired to the mocked catalog and a file store.
pub type TestStorefront = Storefront<CatalogClient, FileStore>;

/// Catalog record for `id`, priced `$id.99`.
#[must_use]
pub fn product_json(id: u32) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "price": f64::from(id * 100 + 99) / 100.0,
        "description": "ignored by the widget",
        "category": "misc",
        "image": format!("https://img.example/{id}.jpg"),
    })
}

/// Catalog records for every id in `ids`.
#[must_use]
pub fn page_json(ids: RangeInclusive<u32>) -> Value {
    Value::Array(ids.map(product_json).collect())
}

/// Serve `pages[n - 1]` for `GET /products?page=n` and each product's detail
/// under `GET /products/{id}`.
pub async fn mount_catalog(server: &MockServer, pages: &[RangeInclusive<u32>]) {
    for (index, ids) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(ids.clone())))
            .mount(server)
            .await;

        for id in ids.clone() {
            Mock::given(method("GET"))
                .and(path(format!("/products/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(product_json(id)))
                .mount(server)
                .await;
        }
    }
}

/// Client pointed at the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid base URL.
#[must_use]
pub fn catalog_client(server: &MockServer) -> CatalogClient {
    let config = CatalogConfig::new(&server.uri()).expect("mock server uri is a base url");
    CatalogClient::new(&config).expect("failed to create catalog client")
}

/// A widget over the mock server, persisting into `dir`.
///
/// # Panics
///
/// Panics if the store cannot be opened.
#[must_use]
pub fn storefront(server: &MockServer, dir: &TempDir) -> TestStorefront {
    let store = FileStore::open(dir.path()).expect("failed to open file store");
    Storefront::new(
        Arc::new(catalog_client(server)),
        store,
        PagingConfig::default(),
    )
}

/// Scroll event with the viewport at the very bottom.
#[must_use]
pub const fn scroll_to_bottom() -> Event {
    Event::Scroll(ScrollMetrics::at_bottom(600, 2000))
}
