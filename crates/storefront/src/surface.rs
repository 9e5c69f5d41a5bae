//! Rendering surface.
//!
//! The [`Surface`] stands in for the page the widget draws into. It holds the
//! rendered HTML of each named region and the triggers bound to rendered
//! controls. A trigger is attached to its node when the node is created and
//! lives exactly as long as the node, so re-rendering never stacks handlers on
//! an existing control.

use askama::Template;
use pocketshop_core::ProductId;

use crate::views::WidgetTemplate;

/// A clickable control identified by its CSS class and data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// `.add-to-cart-btn[data-product-id]` on a product tile.
    AddToCart(ProductId),
    /// `.remove-from-cart-btn[data-product-id]` on a cart line.
    RemoveFromCart(ProductId),
    /// `.page-btn[data-page]` in the pagination strip.
    GoToPage(u32),
}

impl Trigger {
    /// CSS class of the control carrying this trigger.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "add-to-cart-btn",
            Self::RemoveFromCart(_) => "remove-from-cart-btn",
            Self::GoToPage(_) => "page-btn",
        }
    }
}

/// Cart modal visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    /// Slid to the screen edge and visible.
    Open,
    /// Off-screen and hidden.
    #[default]
    Closed,
}

/// One rendered element and the trigger bound to it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    html: String,
    trigger: Option<Trigger>,
}

impl Node {
    /// A node whose control is bound to `trigger`.
    #[must_use]
    pub const fn bound(html: String, trigger: Trigger) -> Self {
        Self {
            html,
            trigger: Some(trigger),
        }
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub const fn trigger(&self) -> Option<Trigger> {
        self.trigger
    }
}

/// Scroll position of the viewport over the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_top: u32,
    pub client_height: u32,
    pub scroll_height: u32,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_top: u32, client_height: u32, scroll_height: u32) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Viewport of `client_height` scrolled all the way down `scroll_height`.
    #[must_use]
    pub const fn at_bottom(client_height: u32, scroll_height: u32) -> Self {
        Self::new(
            scroll_height.saturating_sub(client_height),
            client_height,
            scroll_height,
        )
    }

    /// Whether the visible bottom edge is within `threshold` pixels of the end.
    #[must_use]
    pub const fn near_bottom(&self, threshold: u32) -> bool {
        self.scroll_top.saturating_add(self.client_height)
            >= self.scroll_height.saturating_sub(threshold)
    }
}

/// The named regions of the widget.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    product_list: Vec<Node>,
    pagination: Vec<Node>,
    cart_items: Vec<Node>,
    cart_count: String,
    totals: String,
    modal: ModalState,
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Product list ------------------------------------------------------------

    pub fn append_tile(&mut self, node: Node) {
        self.product_list.push(node);
    }

    #[must_use]
    pub fn tiles(&self) -> &[Node] {
        &self.product_list
    }

    // Pagination --------------------------------------------------------------

    pub fn replace_pagination(&mut self, buttons: Vec<Node>) {
        self.pagination = buttons;
    }

    #[must_use]
    pub fn pagination(&self) -> &[Node] {
        &self.pagination
    }

    // Cart modal --------------------------------------------------------------

    pub fn clear_cart_items(&mut self) {
        self.cart_items.clear();
    }

    pub fn append_cart_item(&mut self, node: Node) {
        self.cart_items.push(node);
    }

    /// Drop the cart line node for `id`. Returns whether one was present.
    pub fn remove_cart_item(&mut self, id: ProductId) -> bool {
        let before = self.cart_items.len();
        self.cart_items
            .retain(|node| node.trigger != Some(Trigger::RemoveFromCart(id)));
        self.cart_items.len() != before
    }

    #[must_use]
    pub fn cart_items(&self) -> &[Node] {
        &self.cart_items
    }

    pub fn set_cart_count(&mut self, html: String) {
        self.cart_count = html;
    }

    #[must_use]
    pub fn cart_count(&self) -> &str {
        &self.cart_count
    }

    pub fn set_totals(&mut self, html: String) {
        self.totals = html;
    }

    #[must_use]
    pub fn totals(&self) -> &str {
        &self.totals
    }

    pub const fn set_modal(&mut self, modal: ModalState) {
        self.modal = modal;
    }

    #[must_use]
    pub const fn modal(&self) -> ModalState {
        self.modal
    }

    // Triggers ----------------------------------------------------------------

    /// Every bound trigger, in region order.
    pub fn triggers(&self) -> impl Iterator<Item = Trigger> + '_ {
        self.product_list
            .iter()
            .chain(&self.pagination)
            .chain(&self.cart_items)
            .filter_map(Node::trigger)
    }

    /// Whether some rendered control carries `trigger`.
    #[must_use]
    pub fn is_bound(&self, trigger: Trigger) -> bool {
        self.triggers().any(|bound| bound == trigger)
    }

    /// Render the whole widget.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        WidgetTemplate {
            badge: &self.cart_count,
            tiles: self.product_list.iter().map(Node::html).collect(),
            pages: self.pagination.iter().map(Node::html).collect(),
            modal_open: self.modal == ModalState::Open,
            cart_items: self.cart_items.iter().map(Node::html).collect(),
            totals: &self.totals,
        }
        .render()
    }
}
