//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_API_URL` - Catalog API base URL (default: <https://fakestoreapi.com>)
//! - `PRODUCTS_PER_PAGE` - Products requested per page (default: 10)
//! - `PAGINATION_PAGES` - Number of page buttons rendered (default: 10)
//! - `SCROLL_THRESHOLD_PX` - Distance from the bottom that triggers the next page (default: 10)
//! - `POCKETSHOP_STORAGE_DIR` - Directory backing the local cart store (default: .pocketshop)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout for catalog calls (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_API_URL: &str = "https://fakestoreapi.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront widget configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Catalog loader paging configuration
    pub paging: PagingConfig,
    /// Directory backing the local key-value store
    pub storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; `/products` is resolved against it
    pub base_url: Url,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
}

/// Page size, pagination strip and infinite scroll settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Products requested per page
    pub page_size: u32,
    /// Number of numbered page buttons
    pub total_pages: u32,
    /// Pixels from the bottom at which the next page loads
    pub scroll_threshold: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            total_pages: 10,
            scroll_threshold: 10,
        }
    }
}

impl CatalogConfig {
    /// Point the catalog at `base_url` with no timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CATALOG_API_URL", base_url)?,
            timeout: None,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog = CatalogConfig::from_env()?;
        let paging = PagingConfig::from_env()?;
        let storage_dir = PathBuf::from(get_env_or_default("POCKETSHOP_STORAGE_DIR", ".pocketshop"));

        Ok(Self {
            catalog,
            paging,
            storage_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "CATALOG_API_URL",
            &get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL),
        )?;
        let timeout = get_optional_env("CATALOG_TIMEOUT_SECS")
            .map(|raw| parse_positive("CATALOG_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(|secs| Duration::from_secs(u64::from(secs)));

        Ok(Self { base_url, timeout })
    }
}

impl PagingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            page_size: parse_positive(
                "PRODUCTS_PER_PAGE",
                &get_env_or_default("PRODUCTS_PER_PAGE", &defaults.page_size.to_string()),
            )?,
            total_pages: parse_positive(
                "PAGINATION_PAGES",
                &get_env_or_default("PAGINATION_PAGES", &defaults.total_pages.to_string()),
            )?,
            scroll_threshold: get_env_or_default(
                "SCROLL_THRESHOLD_PX",
                &defaults.scroll_threshold.to_string(),
            )
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar("SCROLL_THRESHOLD_PX".to_string(), e.to_string()))?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a strictly positive integer.
fn parse_positive(key: &str, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Parse the catalog base URL, ensuring a trailing slash so `join` appends.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
