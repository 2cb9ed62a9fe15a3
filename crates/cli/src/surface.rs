//! Plain-text rendering of store regions.

use std::fmt::Display;
use std::io::{self, Write};

use asn_store_core::{CartLineView, Notice, NoticeKind, ProductCard, RenderSurface};

/// Writes each region as a few lines of text.
pub struct TextSurface<W> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write one line outside any region.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    type Error = io::Error;

    fn product_grid(&mut self, cards: &[ProductCard]) -> io::Result<()> {
        if cards.is_empty() {
            return writeln!(self.out, "No products match your search.");
        }
        for card in cards {
            writeln!(
                self.out,
                "{:<6} {:<24} {:>10}  {}",
                card.id, card.title, card.price, card.description
            )?;
        }
        Ok(())
    }

    fn cart_badge(&mut self, count: u32) -> io::Result<()> {
        writeln!(self.out, "Items in cart: {count}")
    }

    fn cart_lines(&mut self, lines: &[CartLineView]) -> io::Result<()> {
        if lines.is_empty() {
            return writeln!(self.out, "Your cart is empty.");
        }
        for line in lines {
            writeln!(
                self.out,
                "{:>3} x {:<24} {:>10}  ({})",
                line.quantity, line.title, line.line_total, line.product_id
            )?;
        }
        Ok(())
    }

    fn cart_subtotal(&mut self, subtotal: &str) -> io::Result<()> {
        writeln!(self.out, "Subtotal: {subtotal}")
    }

    // Nothing to clear: the terminal has no form state.
    fn reset_checkout_form(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn notice(&mut self, notice: &Notice) -> io::Result<()> {
        let tag = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        writeln!(self.out, "[{tag}] {}", notice.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut TextSurface<Vec<u8>>) -> io::Result<()>) -> String {
        let mut surface = TextSurface::new(Vec::new());
        f(&mut surface).unwrap();
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_regions() {
        assert_eq!(
            render(|s| s.product_grid(&[])),
            "No products match your search.\n"
        );
        assert_eq!(render(|s| s.cart_lines(&[])), "Your cart is empty.\n");
    }

    #[test]
    fn test_cart_line_row() {
        let line = CartLineView {
            product_id: "p1".to_string(),
            title: "Classic T-Shirt".to_string(),
            image_ref: "images/tshirt.jpg".to_string(),
            quantity: 2,
            line_total: "₹798".to_string(),
        };
        let text = render(|s| s.cart_lines(&[line]));
        assert!(text.starts_with("  2 x Classic T-Shirt"));
        assert!(text.contains("₹798"));
        assert!(text.trim_end().ends_with("(p1)"));
    }

    #[test]
    fn test_notice_tags() {
        assert_eq!(
            render(|s| s.notice(&Notice::error("Please fill all required fields"))),
            "[error] Please fill all required fields\n"
        );
        assert_eq!(
            render(|s| s.notice(&Notice::success("Added to cart"))),
            "[ok] Added to cart\n"
        );
    }

    #[test]
    fn test_checkout_reset_writes_nothing() {
        assert_eq!(render(|s| s.reset_checkout_form()), "");
    }
}
