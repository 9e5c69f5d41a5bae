//! The storefront event loop.
//!
//! [`Storefront`] owns the widget state, the surface and both components.
//! User input arrives as [`Event`]s; network calls run as tasks on a
//! [`JoinSet`] and their results are applied back here one at a time, in the
//! order they complete.
//!
//! # In-flight policy
//!
//! - At most one add-to-cart request per product. Clicks on a product whose
//!   add is pending are dropped.
//! - At most one scroll-triggered page load. Threshold hits while it is
//!   pending are dropped and do not advance the current page.
//! - Pagination clicks are not limited.
//! - Removing a product cancels its pending add.
//! - [`Storefront::shutdown`] aborts everything in flight.

use std::collections::HashMap;
use std::sync::Arc;

use pocketshop_core::{Product, ProductId};
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::cart_manager::{self, CartManager};
use crate::catalog::CatalogApi;
use crate::catalog_loader::CatalogLoader;
use crate::config::PagingConfig;
use crate::error::{Result, add_breadcrumb};
use crate::state::ShopState;
use crate::storage::LocalStore;
use crate::surface::{ScrollMetrics, Surface, Trigger};

/// User input delivered to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The viewport scrolled.
    Scroll(ScrollMetrics),
    /// A rendered control was clicked.
    Click(Trigger),
    /// The cart button was clicked.
    OpenCart,
    /// The modal close button was clicked.
    CloseCart,
}

/// Why a page is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageSource {
    Startup,
    Scroll,
    Pagination,
}

/// Result of a finished network task.
#[derive(Debug)]
enum Completion {
    PageLoaded {
        page: u32,
        source: PageSource,
        products: Vec<Product>,
    },
    ProductFetched {
        id: ProductId,
        product: Option<Product>,
    },
}

/// The storefront widget.
pub struct Storefront<C, S> {
    catalog: Arc<C>,
    loader: CatalogLoader,
    cart: CartManager<S>,
    state: ShopState,
    surface: Surface,
    tasks: JoinSet<Completion>,
    pending_adds: HashMap<ProductId, AbortHandle>,
    scroll_load: Option<u32>,
}

impl<C: CatalogApi, S: LocalStore> Storefront<C, S> {
    #[must_use]
    pub fn new(catalog: Arc<C>, store: S, paging: PagingConfig) -> Self {
        Self {
            catalog,
            loader: CatalogLoader::new(paging),
            cart: CartManager::new(store),
            state: ShopState::new(),
            surface: Surface::new(),
            tasks: JoinSet::new(),
            pending_adds: HashMap::new(),
            scroll_load: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ShopState {
        &self.state
    }

    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        self.cart.store()
    }

    /// Number of network tasks still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Restore the cart from the local store and start loading page 1.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn start(&mut self) -> Result<()> {
        self.cart.restore(&mut self.state, &mut self.surface)?;
        self.spawn_page_load(self.state.current_page(), PageSource::Startup);
        info!("Storefront started");
        Ok(())
    }

    /// Handle one user event.
    ///
    /// Network work is started here and finished by [`Self::next_completion`].
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        debug!(?event, "Dispatching event");
        match event {
            Event::Scroll(metrics) => self.on_scroll(metrics),
            Event::Click(trigger) => self.on_click(trigger),
            Event::OpenCart => self.cart.open_cart_modal(&mut self.state, &mut self.surface),
            Event::CloseCart => self.cart.close_cart_modal(&mut self.state, &mut self.surface),
        }
    }

    /// Wait for the next network task and apply its result.
    ///
    /// Returns `None` once nothing is in flight. Cancelled tasks are skipped.
    pub async fn next_completion(&mut self) -> Option<Result<()>> {
        loop {
            match self.tasks.join_next().await? {
                Ok(completion) => return Some(self.apply(completion)),
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::error!(error = %e, "Network task panicked"),
            }
        }
    }

    /// Apply every in-flight result, reporting failures as they come.
    pub async fn settle(&mut self) {
        while let Some(result) = self.next_completion().await {
            if let Err(e) = result {
                e.report("apply_completion");
            }
        }
    }

    /// Abort every in-flight request and wait for the tasks to wind down.
    pub async fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            info!(in_flight = self.tasks.len(), "Aborting in-flight requests");
        }
        self.tasks.shutdown().await;
        self.pending_adds.clear();
        self.scroll_load = None;
    }

    fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if let Some(page) = self.scroll_load {
            debug!(page, "Scroll load already in flight, ignoring");
            return;
        }
        if let Some(page) = self.loader.on_scroll(&mut self.state, metrics) {
            self.scroll_load = Some(page);
            self.spawn_page_load(page, PageSource::Scroll);
        }
    }

    fn on_click(&mut self, trigger: Trigger) {
        if !self.surface.is_bound(trigger) {
            warn!(?trigger, class = trigger.css_class(), "Click on a control that is not rendered");
            return;
        }

        match trigger {
            Trigger::AddToCart(id) => {
                add_breadcrumb("cart", "Add to cart", Some(&[("product_id", id.to_string().as_str())]));
                if self.pending_adds.contains_key(&id) {
                    debug!(%id, "Add already in flight, ignoring");
                    return;
                }
                self.spawn_add(id);
            }
            Trigger::RemoveFromCart(id) => {
                add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", id.to_string().as_str())]));
                if let Some(pending) = self.pending_adds.remove(&id) {
                    pending.abort();
                    info!(%id, "Cancelled pending add");
                }
                if let Err(e) = self.cart.remove_from_cart(&mut self.state, &mut self.surface, id) {
                    e.report("remove_from_cart");
                }
            }
            Trigger::GoToPage(page) => {
                add_breadcrumb("catalog", "Go to page", Some(&[("page", page.to_string().as_str())]));
                self.spawn_page_load(page, PageSource::Pagination);
            }
        }
    }

    fn spawn_page_load(&mut self, page: u32, source: PageSource) {
        let catalog = Arc::clone(&self.catalog);
        let loader = self.loader;
        self.tasks.spawn(async move {
            let products = loader.fetch_page(catalog.as_ref(), page).await;
            Completion::PageLoaded {
                page,
                source,
                products,
            }
        });
    }

    fn spawn_add(&mut self, id: ProductId) {
        let catalog = Arc::clone(&self.catalog);
        let handle = self.tasks.spawn(async move {
            let product = cart_manager::fetch_product(catalog.as_ref(), id).await;
            Completion::ProductFetched { id, product }
        });
        self.pending_adds.insert(id, handle);
    }

    fn apply(&mut self, completion: Completion) -> Result<()> {
        match completion {
            Completion::PageLoaded {
                page,
                source,
                products,
            } => {
                if source == PageSource::Scroll && self.scroll_load == Some(page) {
                    self.scroll_load = None;
                }
                self.loader.render_page(&mut self.surface, page, &products)?;
            }
            Completion::ProductFetched { id, product } => {
                // A result that finished just before its abort still counts as cancelled
                if self.pending_adds.remove(&id).is_none() {
                    debug!(%id, "Dropping result of cancelled add");
                    return Ok(());
                }
                if let Some(product) = product {
                    self.cart.apply_add(&mut self.state, &mut self.surface, product)?;
                }
            }
        }
        Ok(())
    }
}

impl<C, S> Drop for Storefront<C, S> {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}
