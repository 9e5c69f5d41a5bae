//! Catalog loader: product pages, tiles, pagination and infinite scroll.
//!
//! Loading is split in two so the event loop can run the network call as a
//! task: [`CatalogLoader::fetch_page`] talks to the API and never fails (errors
//! are reported and yield no products), [`CatalogLoader::render_page`] applies
//! a fetched page to the surface. [`CatalogLoader::load_products`] runs both.

use askama::Template;
use pocketshop_core::Product;
use tracing::{debug, instrument};

use crate::catalog::CatalogApi;
use crate::config::PagingConfig;
use crate::error::{Result, WidgetError};
use crate::state::ShopState;
use crate::surface::{Node, ScrollMetrics, Surface, Trigger};
use crate::views::{PageButtonTemplate, ProductTileTemplate};

/// Fetches and renders pages of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogLoader {
    paging: PagingConfig,
}

impl CatalogLoader {
    #[must_use]
    pub const fn new(paging: PagingConfig) -> Self {
        Self { paging }
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.paging.page_size
    }

    /// Fetch one page. Failures are reported and produce an empty page.
    #[instrument(skip(self, catalog))]
    pub async fn fetch_page<C: CatalogApi>(&self, catalog: &C, page: u32) -> Vec<Product> {
        match catalog.products(page, self.paging.page_size).await {
            Ok(products) => products,
            Err(e) => {
                WidgetError::from(e).report("fetch_page");
                Vec::new()
            }
        }
    }

    /// Fetch `page` and append its tiles.
    ///
    /// Appends even when the page was already shown; the list is never
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub async fn load_products<C: CatalogApi>(
        &self,
        catalog: &C,
        surface: &mut Surface,
        page: u32,
    ) -> Result<usize> {
        let products = self.fetch_page(catalog, page).await;
        self.render_page(surface, page, &products)
    }

    /// Append one tile per product and redraw the pagination strip.
    ///
    /// Returns the number of tiles appended.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_page(
        &self,
        surface: &mut Surface,
        page: u32,
        products: &[Product],
    ) -> Result<usize> {
        for product in products {
            self.render_product(surface, product)?;
        }
        self.render_pagination(surface)?;
        debug!(page, tiles = products.len(), "Rendered catalog page");
        Ok(products.len())
    }

    /// Append one product tile with its add-to-cart trigger bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the tile template fails to render.
    pub fn render_product(&self, surface: &mut Surface, product: &Product) -> Result<()> {
        let html = ProductTileTemplate::from(product).render()?;
        surface.append_tile(Node::bound(html, Trigger::AddToCart(product.id)));
        Ok(())
    }

    /// Replace the pagination strip with buttons `1..=total_pages`.
    ///
    /// # Errors
    ///
    /// Returns an error if a button template fails to render.
    pub fn render_pagination(&self, surface: &mut Surface) -> Result<()> {
        let buttons = (1..=self.paging.total_pages)
            .map(|page| {
                PageButtonTemplate { page }
                    .render()
                    .map(|html| Node::bound(html, Trigger::GoToPage(page)))
            })
            .collect::<askama::Result<Vec<_>>>()?;
        surface.replace_pagination(buttons);
        Ok(())
    }

    /// Infinite scroll check.
    ///
    /// When the viewport is near the bottom, advances `current_page` and
    /// returns the page to load.
    pub fn on_scroll(&self, state: &mut ShopState, metrics: ScrollMetrics) -> Option<u32> {
        if !metrics.near_bottom(self.paging.scroll_threshold) {
            return None;
        }
        let page = state.next_page();
        debug!(page, "Scrolled near bottom");
        Some(page)
    }
}
