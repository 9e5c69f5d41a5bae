//! Widget state owned by the storefront.

use pocketshop_core::Cart;

use crate::surface::ModalState;

/// All mutable widget state in one place.
///
/// Owned by [`Storefront`](crate::widget::Storefront) and only changed through
/// [`CatalogLoader`](crate::catalog_loader::CatalogLoader) and
/// [`CartManager`](crate::cart_manager::CartManager) operations.
#[derive(Debug, Clone)]
pub struct ShopState {
    cart: Cart,
    current_page: u32,
    cart_count: usize,
    badge_visible: bool,
    modal: ModalState,
}

impl Default for ShopState {
    fn default() -> Self {
        Self {
            cart: Cart::new(),
            current_page: 1,
            cart_count: 0,
            badge_visible: false,
            modal: ModalState::Closed,
        }
    }
}

impl ShopState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub(crate) const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Last page requested by infinite scroll. Starts at 1.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Advance `current_page` and return the new value.
    pub(crate) const fn next_page(&mut self) -> u32 {
        self.current_page = self.current_page.saturating_add(1);
        self.current_page
    }

    /// Count shown on the badge.
    #[must_use]
    pub const fn cart_count(&self) -> usize {
        self.cart_count
    }

    pub(crate) const fn set_cart_count(&mut self, count: usize) {
        self.cart_count = count;
    }

    #[must_use]
    pub const fn badge_visible(&self) -> bool {
        self.badge_visible
    }

    pub(crate) const fn set_badge_visible(&mut self, visible: bool) {
        self.badge_visible = visible;
    }

    #[must_use]
    pub const fn modal(&self) -> ModalState {
        self.modal
    }

    pub(crate) const fn set_modal(&mut self, modal: ModalState) {
        self.modal = modal;
    }
}
