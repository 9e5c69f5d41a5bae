//! Durable local key-value storage for the cart.
//!
//! Two keys are used:
//! - [`CART_ITEMS_KEY`] - JSON array of cart lines, rewritten on every mutation
//! - [`CART_COUNT_KEY`] - last known line count, only ever read at startup
//!
//! [`LocalStore`] mirrors the browser `localStorage` surface (string keys,
//! string values). [`MemoryStore`] backs tests and throwaway sessions,
//! [`FileStore`] persists one file per key in a directory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use pocketshop_core::Cart;
use thiserror::Error;
use tracing::warn;

/// Key holding the serialized cart.
pub const CART_ITEMS_KEY: &str = "cartItems";

/// Key holding the cart line count.
pub const CART_COUNT_KEY: &str = "cartCount";

/// Errors raised by a [`LocalStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be decoded.
    #[error("Corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key cannot be used as a storage slot.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// String key-value storage that outlives the process.
pub trait LocalStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Write the full cart snapshot.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_cart(store: &mut impl LocalStore, cart: &Cart) -> Result<(), StorageError> {
    let json = serde_json::to_string(cart)?;
    store.set_item(CART_ITEMS_KEY, &json)
}

/// Read the stored cart snapshot, if any.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the snapshot is not a
/// valid array of cart lines.
pub fn load_cart(store: &impl LocalStore) -> Result<Option<Cart>, StorageError> {
    let Some(json) = store.get_item(CART_ITEMS_KEY)? else {
        return Ok(None);
    };
    let cart = serde_json::from_str::<Vec<pocketshop_core::CartItem>>(&json)
        .map(Cart::from_items)
        .map_err(|source| StorageError::Corrupt {
            key: CART_ITEMS_KEY.to_string(),
            source,
        })?;
    Ok(Some(cart))
}

/// Read the stored line count, treating anything unreadable as zero.
#[must_use]
pub fn load_cart_count(store: &impl LocalStore) -> usize {
    match store.get_item(CART_COUNT_KEY) {
        Ok(Some(raw)) => parse_count(&raw),
        Ok(None) => 0,
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart count");
            0
        }
    }
}

/// Leading-integer parse: `"3"` and `"3 items"` give 3, garbage gives 0.
fn parse_count(raw: &str) -> usize {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
