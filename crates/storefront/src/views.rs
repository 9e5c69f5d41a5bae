//! Askama templates for every rendered fragment.
//!
//! View structs take already formatted strings; prices are formatted through
//! [`Price::display`](pocketshop_core::Price::display) before they reach a
//! template. Catalog text is HTML-escaped by the templates.

use askama::Template;
use pocketshop_core::{CartItem, CartTotals, Product};

/// Product tile in the product list.
#[derive(Template)]
#[template(path = "partials/product_tile.html")]
pub struct ProductTileTemplate<'a> {
    pub id: String,
    pub title: &'a str,
    pub image: &'a str,
    pub price: String,
}

impl<'a> From<&'a Product> for ProductTileTemplate<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: &product.title,
            image: &product.image,
            price: product.price.display(),
        }
    }
}

/// One numbered button of the pagination strip.
#[derive(Template)]
#[template(path = "partials/page_button.html")]
pub struct PageButtonTemplate {
    pub page: u32,
}

/// Cart line in the cart modal.
#[derive(Template)]
#[template(path = "partials/cart_item.html")]
pub struct CartItemTemplate<'a> {
    pub id: String,
    pub title: &'a str,
    pub image: &'a str,
    pub price: String,
    pub quantity: u32,
}

impl<'a> From<&'a CartItem> for CartItemTemplate<'a> {
    fn from(item: &'a CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: &item.title,
            image: &item.image,
            price: item.price.display(),
            quantity: item.quantity,
        }
    }
}

/// Cart count badge.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
    pub visible: bool,
}

/// Totals footer of the cart modal.
#[derive(Template)]
#[template(path = "partials/cart_totals.html")]
pub struct CartTotalsTemplate {
    pub total_items: usize,
    pub total_price: String,
}

impl From<CartTotals> for CartTotalsTemplate {
    fn from(totals: CartTotals) -> Self {
        Self {
            total_items: totals.total_items,
            total_price: totals.total_price.display(),
        }
    }
}

/// The whole widget, assembled from already rendered fragments.
#[derive(Template)]
#[template(path = "widget.html")]
pub struct WidgetTemplate<'a> {
    pub badge: &'a str,
    pub tiles: Vec<&'a str>,
    pub pages: Vec<&'a str>,
    pub modal_open: bool,
    pub cart_items: Vec<&'a str>,
    pub totals: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocketshop_core::{Price, ProductId};

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(5),
            title: "Silver <Dragon> Ring".to_string(),
            price: Price::from_cents(999),
            image: "https://img.example/5.jpg".to_string(),
        }
    }

    #[test]
    fn test_tile_carries_trigger_attributes() {
        let product = product();
        let html = ProductTileTemplate::from(&product).render().unwrap();

        assert!(html.contains(r#"class="add-to-cart-btn""#));
        assert!(html.contains(r#"data-product-id="5""#));
        assert!(html.contains("Price: $9.99"));
        assert!(html.contains(r#"src="https://img.example/5.jpg""#));
    }

    #[test]
    fn test_tile_escapes_title() {
        let product = product();
        let html = ProductTileTemplate::from(&product).render().unwrap();

        assert!(html.contains("Silver &#60;Dragon&#62; Ring") || html.contains("Silver &lt;Dragon&gt; Ring"));
        assert!(!html.contains("<Dragon>"));
    }

    #[test]
    fn test_cart_item_shows_quantity() {
        let mut item = CartItem::new(product());
        item.quantity = 3;
        let html = CartItemTemplate::from(&item).render().unwrap();

        assert!(html.contains("Quantity: 3"));
        assert!(html.contains(r#"class="remove-from-cart-btn""#));
        assert!(html.contains(r#"class="cart-item" data-product-id="5""#));
    }

    #[test]
    fn test_cart_count_visibility() {
        let hidden = CartCountTemplate { count: 0, visible: false }.render().unwrap();
        assert!(hidden.contains("display: none"));

        let shown = CartCountTemplate { count: 2, visible: true }.render().unwrap();
        assert!(!shown.contains("display: none"));
        assert!(shown.contains(">2<"));
    }

    #[test]
    fn test_totals_footer() {
        let totals = CartTotals {
            total_items: 1,
            total_price: Price::from_cents(999),
        };
        let html = CartTotalsTemplate::from(totals).render().unwrap();

        assert!(html.contains("Total Items: 1"));
        assert!(html.contains("Total Price: $9.99"));
    }

    #[test]
    fn test_page_button() {
        let html = PageButtonTemplate { page: 4 }.render().unwrap();
        assert!(html.contains(r#"data-page="4""#));
        assert!(html.contains(">4<"));
    }
}
