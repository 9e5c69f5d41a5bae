//! Cart manager: cart mutations, the cart modal, the badge and persistence.
//!
//! Every mutation rewrites the full cart snapshot under
//! [`CART_ITEMS_KEY`](crate::storage::CART_ITEMS_KEY). A failed write is
//! reported but does not undo the in-memory change.

use askama::Template;
use pocketshop_core::{AddOutcome, CartItem, CartTotals, Product, ProductId};
use tracing::{debug, info, instrument};

use crate::catalog::CatalogApi;
use crate::error::{Result, WidgetError};
use crate::state::ShopState;
use crate::storage::{self, LocalStore};
use crate::surface::{ModalState, Node, Surface, Trigger};
use crate::views::{CartCountTemplate, CartItemTemplate, CartTotalsTemplate};

/// Owns the local store and applies cart operations to the widget state.
#[derive(Debug)]
pub struct CartManager<S> {
    store: S,
}

impl<S: LocalStore> CartManager<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Seed the widget from the local store at startup.
    ///
    /// The stored cart is restored in full. When no snapshot exists the badge
    /// falls back to the stored count. The badge is shown only for a non-zero
    /// count.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render. An unreadable snapshot
    /// is reported and treated as absent.
    pub fn restore(&self, state: &mut ShopState, surface: &mut Surface) -> Result<()> {
        let stored_count = storage::load_cart_count(&self.store);
        let count = match storage::load_cart(&self.store) {
            Ok(Some(cart)) => {
                let count = cart.len();
                *state.cart_mut() = cart;
                count
            }
            Ok(None) => stored_count,
            Err(e) => {
                WidgetError::from(e).report("restore_cart");
                stored_count
            }
        };

        state.set_cart_count(count);
        state.set_badge_visible(count > 0);
        render_badge(state, surface)?;
        self.update_cart_summary(state, surface)?;
        info!(lines = state.cart().len(), badge = count, "Cart restored");
        Ok(())
    }

    /// Fetch `id` and add it to the cart.
    ///
    /// Returns `None` when the product could not be fetched; nothing changes
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub async fn add_to_cart<C: CatalogApi>(
        &mut self,
        catalog: &C,
        state: &mut ShopState,
        surface: &mut Surface,
        id: ProductId,
    ) -> Result<Option<AddOutcome>> {
        let Some(product) = fetch_product(catalog, id).await else {
            return Ok(None);
        };
        self.apply_add(state, surface, product).map(Some)
    }

    /// Add an already fetched product, then refresh the badge and summary,
    /// persist, show the badge and open the modal.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    #[instrument(skip(self, state, surface, product), fields(product_id = %product.id))]
    pub fn apply_add(
        &mut self,
        state: &mut ShopState,
        surface: &mut Surface,
        product: Product,
    ) -> Result<AddOutcome> {
        let outcome = state.cart_mut().add(product);
        debug!(?outcome, "Cart updated");
        // The snapshot matches the cart even when a template fails below
        self.persist(state);

        state.set_badge_visible(true);
        self.update_cart_count(state, surface)?;
        self.update_cart_summary(state, surface)?;
        self.open_cart_modal(state, surface);
        Ok(outcome)
    }

    /// Remove the line for `id`.
    ///
    /// The line's node is dropped from the cart items region directly and only
    /// the totals are recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::NotInCart`] if there is no such line; the cart,
    /// badge and snapshot are untouched then.
    #[instrument(skip(self, state, surface))]
    pub fn remove_from_cart(
        &mut self,
        state: &mut ShopState,
        surface: &mut Surface,
        id: ProductId,
    ) -> Result<CartItem> {
        let removed = state
            .cart_mut()
            .remove(id)
            .ok_or(WidgetError::NotInCart(id))?;
        self.persist(state);

        self.update_cart_count(state, surface)?;
        if !surface.remove_cart_item(id) {
            debug!("Cart line was not rendered");
        }
        update_cart_totals(state, surface)?;
        Ok(removed)
    }

    /// Set the badge count to the number of cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the badge template fails to render.
    pub fn update_cart_count(&self, state: &mut ShopState, surface: &mut Surface) -> Result<()> {
        state.set_cart_count(state.cart().len());
        render_badge(state, surface)
    }

    /// Clear and redraw the cart items region and the totals footer.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn update_cart_summary(&self, state: &ShopState, surface: &mut Surface) -> Result<CartTotals> {
        surface.clear_cart_items();
        for item in state.cart().items() {
            let html = CartItemTemplate::from(item).render()?;
            surface.append_cart_item(Node::bound(html, Trigger::RemoveFromCart(item.id)));
        }
        update_cart_totals(state, surface)
    }

    pub fn open_cart_modal(&self, state: &mut ShopState, surface: &mut Surface) {
        state.set_modal(ModalState::Open);
        surface.set_modal(ModalState::Open);
    }

    pub fn close_cart_modal(&self, state: &mut ShopState, surface: &mut Surface) {
        state.set_modal(ModalState::Closed);
        surface.set_modal(ModalState::Closed);
    }

    fn persist(&mut self, state: &ShopState) {
        if let Err(e) = storage::save_cart(&mut self.store, state.cart()) {
            WidgetError::from(e).report("persist_cart");
        }
    }
}

/// Fetch product detail for the cart. Failures are reported and yield `None`.
///
/// Always a fresh request; listing data is not reused.
#[instrument(skip(catalog))]
pub async fn fetch_product<C: CatalogApi>(catalog: &C, id: ProductId) -> Option<Product> {
    match catalog.product(id).await {
        Ok(product) => Some(product),
        Err(e) => {
            WidgetError::from(e).report("add_to_cart");
            None
        }
    }
}

fn render_badge(state: &ShopState, surface: &mut Surface) -> Result<()> {
    let html = CartCountTemplate {
        count: state.cart_count(),
        visible: state.badge_visible(),
    }
    .render()?;
    surface.set_cart_count(html);
    Ok(())
}

fn update_cart_totals(state: &ShopState, surface: &mut Surface) -> Result<CartTotals> {
    let totals = state.cart().totals();
    surface.set_totals(CartTotalsTemplate::from(totals).render()?);
    Ok(totals)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use pocketshop_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{CART_COUNT_KEY, CART_ITEMS_KEY, MemoryStore};
    use crate::test_support::{StubCatalog, products};

    fn stored_ids(store: &MemoryStore) -> BTreeSet<ProductId> {
        storage::load_cart(store)
            .unwrap()
            .map(|cart| cart.ids().collect())
            .unwrap_or_default()
    }

    fn cart_ids(state: &ShopState) -> BTreeSet<ProductId> {
        state.cart().ids().collect()
    }

    fn product(id: u32, price: Price) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price,
            image: format!("https://img.example/{id}.jpg"),
        }
    }

    #[tokio::test]
    async fn test_add_distinct_products() {
        let catalog = StubCatalog::with_pages(vec![products(1..=5)]);
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        for id in [2, 4, 1] {
            let outcome = manager
                .add_to_cart(&catalog, &mut state, &mut surface, ProductId::new(id))
                .await
                .unwrap();
            assert_eq!(outcome, Some(AddOutcome::Inserted));
        }

        assert_eq!(state.cart().len(), 3);
        assert_eq!(state.cart_count(), 3);
        assert_eq!(surface.cart_items().len(), 3);
        assert_eq!(stored_ids(manager.store()), cart_ids(&state));
        assert_eq!(catalog.product_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_add_same_product_twice_increments() {
        let catalog = StubCatalog::with_pages(vec![products(1..=5)]);
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();
        let id = ProductId::new(3);

        manager.add_to_cart(&catalog, &mut state, &mut surface, id).await.unwrap();
        let outcome = manager.add_to_cart(&catalog, &mut state, &mut surface, id).await.unwrap();

        assert_eq!(outcome, Some(AddOutcome::Incremented(2)));
        assert_eq!(state.cart().len(), 1);
        assert_eq!(state.cart_count(), 1);
        assert_eq!(surface.cart_items().len(), 1);
        assert!(surface.cart_items()[0].html().contains("Quantity: 2"));

        let stored = storage::load_cart(manager.store()).unwrap().unwrap();
        assert_eq!(stored.get(id).unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_changes_nothing() {
        let catalog = StubCatalog::failing();
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        let outcome = manager
            .add_to_cart(&catalog, &mut state, &mut surface, ProductId::new(1))
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert!(state.cart().is_empty());
        assert_eq!(state.modal(), ModalState::Closed);
        assert!(!state.badge_visible());
        assert!(manager.store().get_item(CART_ITEMS_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_product_changes_nothing() {
        let catalog = StubCatalog::with_pages(vec![products(1..=2)]);
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        let outcome = manager
            .add_to_cart(&catalog, &mut state, &mut surface, ProductId::new(99))
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_add_opens_modal_and_shows_badge() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager
            .apply_add(&mut state, &mut surface, product(5, Price::from_cents(999)))
            .unwrap();

        assert_eq!(state.modal(), ModalState::Open);
        assert_eq!(surface.modal(), ModalState::Open);
        assert!(state.badge_visible());
        assert!(surface.cart_count().contains(">1<"));
        assert!(surface.totals().contains("Total Items: 1"));
        assert!(surface.totals().contains("Total Price: $9.99"));
        assert!(surface.is_bound(Trigger::RemoveFromCart(ProductId::new(5))));
    }

    #[test]
    fn test_remove_then_summary_is_empty() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();
        let id = ProductId::new(5);

        manager
            .apply_add(&mut state, &mut surface, product(5, Price::from_cents(999)))
            .unwrap();
        let removed = manager.remove_from_cart(&mut state, &mut surface, id).unwrap();

        assert_eq!(removed.id, id);
        assert!(state.cart().is_empty());
        assert!(surface.cart_items().is_empty());
        assert!(surface.cart_count().contains(">0<"));
        assert!(surface.totals().contains("Total Items: 0"));
        assert!(surface.totals().contains("Total Price: $0.00"));
        assert!(stored_ids(manager.store()).is_empty());
        // Removal never closes the modal
        assert_eq!(state.modal(), ModalState::Open);
    }

    #[test]
    fn test_remove_missing_leaves_everything_unchanged() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();
        manager
            .apply_add(&mut state, &mut surface, product(1, Price::from_cents(100)))
            .unwrap();

        let snapshot_before = manager.store().get_item(CART_ITEMS_KEY).unwrap();
        let cart_before = state.cart().clone();
        let badge_before = surface.cart_count().to_string();

        let err = manager
            .remove_from_cart(&mut state, &mut surface, ProductId::new(42))
            .unwrap_err();

        assert!(matches!(err, WidgetError::NotInCart(id) if id == ProductId::new(42)));
        assert_eq!(state.cart(), &cart_before);
        assert_eq!(state.cart_count(), 1);
        assert_eq!(surface.cart_count(), badge_before);
        assert_eq!(manager.store().get_item(CART_ITEMS_KEY).unwrap(), snapshot_before);
    }

    #[test]
    fn test_totals_are_quantity_unaware() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager
            .apply_add(&mut state, &mut surface, product(1, Price::new(Decimal::new(1000, 2))))
            .unwrap();
        manager
            .apply_add(&mut state, &mut surface, product(2, Price::new(Decimal::new(5505, 3))))
            .unwrap();
        let totals = manager
            .apply_add(&mut state, &mut surface, product(2, Price::new(Decimal::new(5505, 3))))
            .map(|_| state.cart().totals())
            .unwrap();

        assert_eq!(totals.total_items, 2);
        assert_eq!(totals.total_price.display(), "$15.51");
        assert!(surface.totals().contains("Total Price: $15.51"));
    }

    #[test]
    fn test_restore_full_cart() {
        let mut seeded = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();
        seeded
            .apply_add(&mut state, &mut surface, product(1, Price::from_cents(100)))
            .unwrap();
        seeded
            .apply_add(&mut state, &mut surface, product(2, Price::from_cents(200)))
            .unwrap();

        let manager = CartManager::new(seeded.store().clone());
        let mut restored = ShopState::new();
        let mut fresh_surface = Surface::new();
        manager.restore(&mut restored, &mut fresh_surface).unwrap();

        assert_eq!(restored.cart(), state.cart());
        assert_eq!(restored.cart_count(), 2);
        assert!(restored.badge_visible());
        assert_eq!(fresh_surface.cart_items().len(), 2);
        assert_eq!(restored.modal(), ModalState::Closed);
    }

    #[test]
    fn test_restore_falls_back_to_stored_count() {
        let mut store = MemoryStore::new();
        store.set_item(CART_COUNT_KEY, "4").unwrap();
        let manager = CartManager::new(store);
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager.restore(&mut state, &mut surface).unwrap();

        assert!(state.cart().is_empty());
        assert_eq!(state.cart_count(), 4);
        assert!(state.badge_visible());
        assert!(surface.cart_count().contains(">4<"));
    }

    #[test]
    fn test_restore_empty_store_hides_badge() {
        let manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager.restore(&mut state, &mut surface).unwrap();

        assert!(!state.badge_visible());
        assert!(surface.cart_count().contains("display: none"));
        assert!(surface.totals().contains("Total Price: $0.00"));
    }

    #[test]
    fn test_restore_ignores_corrupt_snapshot() {
        let mut store = MemoryStore::new();
        store.set_item(CART_ITEMS_KEY, "not json").unwrap();
        store.set_item(CART_COUNT_KEY, "2").unwrap();
        let manager = CartManager::new(store);
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager.restore(&mut state, &mut surface).unwrap();

        assert!(state.cart().is_empty());
        assert_eq!(state.cart_count(), 2);
    }

    #[test]
    fn test_cart_count_key_is_never_written() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();
        manager
            .apply_add(&mut state, &mut surface, product(1, Price::from_cents(100)))
            .unwrap();

        assert!(manager.store().get_item(CART_COUNT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_snapshot_tracks_cart_after_every_mutation() {
        let mut manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        for id in [3, 8, 3, 5] {
            manager
                .apply_add(&mut state, &mut surface, product(id, Price::from_cents(100)))
                .unwrap();
            assert_eq!(stored_ids(manager.store()), cart_ids(&state));
        }
        let stored = storage::load_cart(manager.store()).unwrap().unwrap();
        assert_eq!(stored.get(ProductId::new(3)).unwrap().quantity, 2);

        for id in [8, 3] {
            manager
                .remove_from_cart(&mut state, &mut surface, ProductId::new(id))
                .unwrap();
            assert_eq!(stored_ids(manager.store()), cart_ids(&state));
        }
        assert_eq!(
            stored_ids(manager.store()),
            BTreeSet::from([ProductId::new(5)])
        );
    }

    #[test]
    fn test_modal_toggles() {
        let manager = CartManager::new(MemoryStore::new());
        let mut state = ShopState::new();
        let mut surface = Surface::new();

        manager.open_cart_modal(&mut state, &mut surface);
        assert_eq!(state.modal(), ModalState::Open);
        manager.close_cart_modal(&mut state, &mut surface);
        assert_eq!(state.modal(), ModalState::Closed);
        assert_eq!(surface.modal(), ModalState::Closed);
    }
}
