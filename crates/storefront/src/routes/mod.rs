//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Store page (grid, cart, checkout)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product grid fragment for ?search&category&sort
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart lines and subtotal
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add a product
//! POST /cart/update            - Change a line's quantity by a delta
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! POST /checkout               - Validate details and place a simulated order
//!
//! # Notices
//! GET  /notice                 - Current notice (empty once expired)
//! ```
//!
//! Mutating routes answer with out-of-band fragments for every region the
//! action changed, so the page only needs `hx-swap="none"` on its controls.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notice;

use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use asn_store_core::Update;

use crate::error::Result;
use crate::render::HtmlSurface;
use crate::state::{AppState, SharedSession};

/// Create the storefront routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/products", get(catalog::products))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .route("/notice", get(notice::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Render an update as out-of-band fragments, posting its notice first.
fn present(state: &AppState, session: &SharedSession, update: &Update) -> Result<Html<String>> {
    if let Some(notice) = &update.notice {
        state.post_notice(notice.clone())?;
    }

    let mut surface = HtmlSurface::out_of_band(state.config().timing.notice_ttl);
    session.present(update, &mut surface)?;
    Ok(Html(surface.into_html()))
}
