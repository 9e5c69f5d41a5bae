//! Unified error handling with Sentry integration.
//!
//! Every widget failure is handled the same way: log a diagnostic, abort the
//! current operation, leave visible state unchanged. [`WidgetError::report`]
//! is the single place that does the logging and forwards catalog failures to
//! Sentry.

use pocketshop_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Removal was requested for a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),
}

impl WidgetError {
    /// Log the failure of `operation` and capture it to Sentry if it came from
    /// an external system.
    pub fn report(&self, operation: &str) {
        match self {
            Self::Catalog(_) | Self::Storage(_) => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    operation,
                    sentry_event_id = %event_id,
                    "Storefront operation failed"
                );
            }
            Self::Render(_) => {
                tracing::error!(error = %self, operation, "Storefront operation failed");
            }
            Self::NotInCart(_) => {
                tracing::info!(error = %self, operation, "Storefront operation skipped");
            }
        }
    }
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "5")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
