//! The boundary between store logic and whatever draws it.
//!
//! A [`RenderSurface`] receives fully prepared view data for one display
//! region at a time. Each call replaces that region's previous contents, so
//! rendering the same state twice yields the same output.

use serde::Serialize;

use crate::cart::CartLine;
use crate::catalog::{Catalog, Product};

/// Image shown for cart lines whose product is no longer in the catalog.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

/// An independently re-renderable part of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    ProductGrid,
    CartBadge,
    CartLines,
    CartSubtotal,
    CheckoutForm,
}

/// Regions that depend on the cart contents.
pub const CART_REGIONS: &[Region] = &[Region::CartBadge, Region::CartLines, Region::CartSubtotal];

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Product grid card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_ref: String,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, catalog: &Catalog) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: catalog.currency().format(product.price),
            image_ref: image_or_placeholder(&product.image_ref).to_string(),
        }
    }
}

fn image_or_placeholder(image_ref: &str) -> &str {
    if image_ref.trim().is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        image_ref
    }
}

/// One row of the cart list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub image_ref: String,
    pub quantity: u32,
    pub line_total: String,
}

impl CartLineView {
    /// Resolve a cart line against the catalog, falling back to the id as
    /// title, a placeholder image and a zero price for unknown products.
    #[must_use]
    pub fn new(line: &CartLine, catalog: &Catalog) -> Self {
        let product = catalog.get(line.id.as_str());
        let unit_price = catalog.price_of(line.id.as_str());

        Self {
            product_id: line.id.to_string(),
            title: product.map_or_else(|| line.id.to_string(), |p| p.title.clone()),
            image_ref: image_or_placeholder(product.map_or("", |p| p.image_ref.as_str())).to_string(),
            quantity: line.quantity,
            line_total: catalog.currency().format(unit_price.times(line.quantity)),
        }
    }
}

/// A display that the store can project its state onto.
pub trait RenderSurface {
    type Error;

    /// Replace the product grid.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn product_grid(&mut self, cards: &[ProductCard]) -> Result<(), Self::Error>;

    /// Replace the cart badge count.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn cart_badge(&mut self, count: u32) -> Result<(), Self::Error>;

    /// Replace the cart line list. An empty slice means the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn cart_lines(&mut self, lines: &[CartLineView]) -> Result<(), Self::Error>;

    /// Replace the formatted subtotal.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn cart_subtotal(&mut self, subtotal: &str) -> Result<(), Self::Error>;

    /// Clear the checkout form fields.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn reset_checkout_form(&mut self) -> Result<(), Self::Error>;

    /// Show a transient notice.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    fn notice(&mut self, notice: &Notice) -> Result<(), Self::Error>;
}
