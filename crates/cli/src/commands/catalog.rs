//! Browsing commands.

use std::io::Write;

use asn_store_core::{FilterState, KeyValueStore, Region, StoreSession};

use super::Result;
use crate::surface::TextSurface;

/// List the products matching `filter`.
pub fn products<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    filter: FilterState,
    out: &mut TextSurface<W>,
) -> Result {
    session.set_filter(filter);
    session.render(Region::ProductGrid, out)?;
    Ok(())
}

/// List categories in first-seen order.
pub fn categories<S: KeyValueStore, W: Write>(
    session: &StoreSession<S>,
    out: &mut TextSurface<W>,
) -> Result {
    for category in session.catalog().categories() {
        out.line(category)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use asn_store_core::{Catalog, MemoryStore, SortMode};

    use super::*;

    fn session() -> StoreSession<MemoryStore> {
        StoreSession::open(Catalog::sample(), MemoryStore::new())
    }

    fn output(surface: TextSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_products_filtered_and_sorted() {
        let mut session = session();
        let mut out = TextSurface::new(Vec::new());
        products(
            &mut session,
            FilterState::new("", "Clothing", SortMode::PriceAscending),
            &mut out,
        )
        .unwrap();

        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Classic T-Shirt"));
        assert!(lines[1].contains("Denim Jacket"));
    }

    #[test]
    fn test_products_no_match() {
        let mut session = session();
        let mut out = TextSurface::new(Vec::new());
        products(
            &mut session,
            FilterState::new("submarine", "", SortMode::None),
            &mut out,
        )
        .unwrap();
        assert_eq!(output(out), "No products match your search.\n");
    }

    #[test]
    fn test_categories() {
        let session = session();
        let mut out = TextSurface::new(Vec::new());
        categories(&session, &mut out).unwrap();
        assert_eq!(output(out), "Clothing\nFootwear\nElectronics\nHome\n");
    }
}
