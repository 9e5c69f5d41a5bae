//! In-memory catalog for unit tests.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use pocketshop_core::{Price, Product, ProductId};
use tokio::sync::Semaphore;

use crate::catalog::{CatalogApi, CatalogError};

/// Products with ids in `ids`, priced `$id.99`.
pub fn products(ids: RangeInclusive<u32>) -> Vec<Product> {
    ids.map(|id| Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::from_cents(i64::from(id) * 100 + 99),
        image: format!("https://img.example/{id}.jpg"),
    })
    .collect()
}

/// Catalog answering from fixed pages.
///
/// Page `n` is `pages[n - 1]`; pages past the end are empty. Product detail is
/// served for every product on any page. A gated catalog holds every call
/// until [`StubCatalog::release`] hands out a permit.
#[derive(Clone, Default)]
pub struct StubCatalog {
    pages: Arc<Vec<Vec<Product>>>,
    details: Arc<HashMap<ProductId, Product>>,
    failing: bool,
    gate: Option<Arc<Semaphore>>,
    page_requests: Arc<Mutex<Vec<(u32, u32)>>>,
    product_requests: Arc<Mutex<Vec<ProductId>>>,
}

impl StubCatalog {
    pub fn with_pages(pages: Vec<Vec<Product>>) -> Self {
        let details = pages
            .iter()
            .flatten()
            .map(|product| (product.id, product.clone()))
            .collect();
        Self {
            pages: Arc::new(pages),
            details: Arc::new(details),
            ..Self::default()
        }
    }

    /// Every call fails with a 503.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Pages still load but product detail is never found.
    pub fn without_details(mut self) -> Self {
        self.details = Arc::new(HashMap::new());
        self
    }

    /// Hold every call until released.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `calls` held calls complete.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    #[allow(clippy::unwrap_used)]
    pub fn page_requests(&self) -> Vec<(u32, u32)> {
        self.page_requests.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    pub fn product_requests(&self) -> Vec<ProductId> {
        self.product_requests.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }

    fn unavailable() -> CatalogError {
        CatalogError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "stub catalog unavailable".to_string(),
        }
    }
}

#[allow(clippy::unwrap_used)]
impl CatalogApi for StubCatalog {
    async fn products(&self, page: u32, limit: u32) -> Result<Vec<Product>, CatalogError> {
        self.page_requests.lock().unwrap().push((page, limit));
        self.pass_gate().await;
        if self.failing {
            return Err(Self::unavailable());
        }
        let index = usize::try_from(page).unwrap_or(usize::MAX).saturating_sub(1);
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.product_requests.lock().unwrap().push(id);
        self.pass_gate().await;
        if self.failing {
            return Err(Self::unavailable());
        }
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))
    }
}
