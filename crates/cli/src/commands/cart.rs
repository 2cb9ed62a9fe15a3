//! Cart commands.

use std::io::Write;

use asn_store_core::{KeyValueStore, Notice, Region, RenderSurface, StoreSession, Update};

use super::Result;
use crate::surface::TextSurface;

/// Print the cart lines, subtotal and item count.
pub fn show<S: KeyValueStore, W: Write>(
    session: &StoreSession<S>,
    out: &mut TextSurface<W>,
) -> Result {
    let update = Update::regions(&[Region::CartLines, Region::CartSubtotal, Region::CartBadge]);
    session.present(&update, out)?;
    Ok(())
}

/// Add `quantity` of a product.
///
/// # Errors
///
/// Fails with [`super::CommandError::Cart`] for a product outside the catalog,
/// after printing an error notice.
pub fn add<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    id: &str,
    quantity: u32,
    out: &mut TextSurface<W>,
) -> Result {
    match session.add_to_cart(id, quantity) {
        Ok(update) => {
            session.present(&update, out)?;
            Ok(())
        }
        Err(e) => {
            out.notice(&Notice::error(e.to_string()))?;
            Err(e.into())
        }
    }
}

/// Change a line's quantity by `delta`.
pub fn change<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    id: &str,
    delta: i64,
    out: &mut TextSurface<W>,
) -> Result {
    let update = session.change_quantity(id, delta);
    report(session, id, &update, out)
}

/// Remove a line.
pub fn remove<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    id: &str,
    out: &mut TextSurface<W>,
) -> Result {
    let update = session.remove_item(id);
    report(session, id, &update, out)
}

/// Empty the cart.
pub fn clear<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    out: &mut TextSurface<W>,
) -> Result {
    let update = session.clear();
    session.present(&update, out)?;
    Ok(())
}

fn report<S: KeyValueStore, W: Write>(
    session: &StoreSession<S>,
    id: &str,
    update: &Update,
    out: &mut TextSurface<W>,
) -> Result {
    if update.dirty.is_empty() {
        out.notice(&Notice::info(format!("{id} is not in the cart")))?;
    } else {
        session.present(update, out)?;
    }
    Ok(())
}
