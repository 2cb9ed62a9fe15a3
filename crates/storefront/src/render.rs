//! HTML rendering of store regions.
//!
//! [`HtmlSurface`] implements the core [`RenderSurface`] by rendering one
//! Askama fragment per region. Fragments carry stable element ids, so they
//! can either be swapped in as the main HTMX target or sent out-of-band
//! alongside other fragments.

use std::time::Duration;

use askama::Template;

use asn_store_core::{CartLineView, Notice, ProductCard, RenderSurface};

/// Product grid fragment.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCard>,
    pub oob: bool,
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
    pub oob: bool,
}

/// Cart line list fragment.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub lines: Vec<CartLineView>,
    pub oob: bool,
}

/// Cart subtotal fragment.
#[derive(Template)]
#[template(path = "partials/cart_subtotal.html")]
pub struct CartSubtotalTemplate {
    pub subtotal: String,
    pub oob: bool,
}

/// Empty checkout form fragment.
#[derive(Template)]
#[template(path = "partials/checkout_form.html")]
pub struct CheckoutFormTemplate {
    pub oob: bool,
}

/// Notice fragment. With no notice it renders an empty placeholder.
#[derive(Template)]
#[template(path = "partials/notice.html")]
pub struct NoticeTemplate {
    pub notice: Option<Notice>,
    pub kind: &'static str,
    pub clear_after_ms: u128,
    pub oob: bool,
}

impl NoticeTemplate {
    #[must_use]
    pub fn new(notice: Option<Notice>, clear_after: Duration, oob: bool) -> Self {
        let kind = notice.as_ref().map_or("", notice_class);
        Self {
            notice,
            kind,
            clear_after_ms: clear_after.as_millis(),
            oob,
        }
    }
}

const fn notice_class(notice: &Notice) -> &'static str {
    match notice.kind {
        asn_store_core::NoticeKind::Info => "notice-info",
        asn_store_core::NoticeKind::Success => "notice-success",
        asn_store_core::NoticeKind::Error => "notice-error",
    }
}

/// Collects rendered fragments into one HTML response body.
#[derive(Debug)]
pub struct HtmlSurface {
    html: String,
    oob: bool,
    notice_ttl: Duration,
}

impl HtmlSurface {
    /// Fragments meant to be the main swap target.
    #[must_use]
    pub const fn inline(notice_ttl: Duration) -> Self {
        Self {
            html: String::new(),
            oob: false,
            notice_ttl,
        }
    }

    /// Fragments swapped out-of-band by id.
    #[must_use]
    pub const fn out_of_band(notice_ttl: Duration) -> Self {
        Self {
            html: String::new(),
            oob: true,
            notice_ttl,
        }
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    fn push(&mut self, template: &impl Template) -> askama::Result<()> {
        template.render_into(&mut self.html)?;
        self.html.push('\n');
        Ok(())
    }
}

impl RenderSurface for HtmlSurface {
    type Error = askama::Error;

    fn product_grid(&mut self, cards: &[ProductCard]) -> askama::Result<()> {
        self.push(&ProductGridTemplate {
            cards: cards.to_vec(),
            oob: self.oob,
        })
    }

    fn cart_badge(&mut self, count: u32) -> askama::Result<()> {
        self.push(&CartCountTemplate {
            count,
            oob: self.oob,
        })
    }

    fn cart_lines(&mut self, lines: &[CartLineView]) -> askama::Result<()> {
        self.push(&CartItemsTemplate {
            lines: lines.to_vec(),
            oob: self.oob,
        })
    }

    fn cart_subtotal(&mut self, subtotal: &str) -> askama::Result<()> {
        self.push(&CartSubtotalTemplate {
            subtotal: subtotal.to_string(),
            oob: self.oob,
        })
    }

    fn reset_checkout_form(&mut self) -> askama::Result<()> {
        self.push(&CheckoutFormTemplate { oob: self.oob })
    }

    fn notice(&mut self, notice: &Notice) -> askama::Result<()> {
        self.push(&NoticeTemplate::new(
            Some(notice.clone()),
            self.notice_ttl,
            self.oob,
        ))
    }
}
