//! Cart management against the local store.
//!
//! # Usage
//!
//! ```bash
//! pocketshop cart show
//! pocketshop cart add 5
//! pocketshop cart remove 5
//! ```
//!
//! # Environment Variables
//!
//! - `POCKETSHOP_STORAGE_DIR` - Directory holding the persisted cart
//! - `CATALOG_API_URL` - Base URL of the catalog API (`add` only)

use pocketshop_core::{AddOutcome, ProductId};
use pocketshop_storefront::cart_manager::CartManager;
use pocketshop_storefront::catalog::CatalogApi;
use pocketshop_storefront::state::ShopState;
use pocketshop_storefront::storage::{self, LocalStore};
use pocketshop_storefront::surface::Surface;

use super::{CommandError, format_cart};

/// Print the stored cart.
///
/// # Errors
///
/// Returns an error if the stored snapshot cannot be read.
pub fn show<S: LocalStore>(store: &S) -> Result<String, CommandError> {
    let cart = storage::load_cart(store)?.unwrap_or_default();
    Ok(format_cart(&cart))
}

/// Fetch a product and add it to the stored cart.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched.
pub async fn add<C: CatalogApi, S: LocalStore>(
    catalog: &C,
    store: S,
    id: ProductId,
) -> Result<String, CommandError> {
    let (mut manager, mut state, mut surface) = restore(store)?;
    let outcome = manager
        .add_to_cart(catalog, &mut state, &mut surface, id)
        .await?
        .ok_or(CommandError::ProductUnavailable(id))?;

    let headline = match outcome {
        AddOutcome::Inserted => format!("Added product {id}"),
        AddOutcome::Incremented(quantity) => format!("Product {id} now has quantity {quantity}"),
    };
    Ok(format!("{headline}\n{}", format_cart(state.cart())))
}

/// Remove a product from the stored cart.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove<S: LocalStore>(store: S, id: ProductId) -> Result<String, CommandError> {
    let (mut manager, mut state, mut surface) = restore(store)?;
    let removed = manager.remove_from_cart(&mut state, &mut surface, id)?;
    Ok(format!("Removed {}\n{}", removed.title, format_cart(state.cart())))
}

fn restore<S: LocalStore>(store: S) -> Result<(CartManager<S>, ShopState, Surface), CommandError> {
    let manager = CartManager::new(store);
    let mut state = ShopState::new();
    let mut surface = Surface::new();
    manager.restore(&mut state, &mut surface)?;
    Ok((manager, state, surface))
}
