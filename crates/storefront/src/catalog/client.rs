//! HTTP implementation of [`CatalogApi`].

use std::sync::Arc;

use pocketshop_core::{Product, ProductId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::conversions::ProductRecord;
use super::{CatalogApi, CatalogError};
use crate::config::CatalogConfig;

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// cannot be extended with `products`.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let products_url = config.base_url.join("products")?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: builder.build()?,
                products_url,
            }),
        })
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// An empty or `null` body on a success status is reported as
    /// [`CatalogError::NotFound`]; the API answers unknown ids that way.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        let trimmed = response_text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        serde_json::from_str(trimmed).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    fn product_url(&self, id: ProductId) -> Url {
        let mut url = self.inner.products_url.clone();
        // The products URL is always hierarchical, see CatalogConfig
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn products(&self, page: u32, limit: u32) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.inner.products_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("page", &page.to_string());

        let records: Vec<ProductRecord> = self.get_json(url, &format!("page {page}")).await?;
        debug!(count = records.len(), "Fetched catalog page");
        Ok(records.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let record: ProductRecord = self
            .get_json(self.product_url(id), &format!("product {id}"))
            .await?;
        Ok(Product::from(record))
    }
}
