//! Cart route handlers.
//!
//! Every mutation returns the changed regions as out-of-band fragments. The
//! cart itself is persisted by the session on each change.

use axum::{Form, extract::State, response::Html};
use serde::Deserialize;
use tracing::instrument;

use asn_store_core::{Notice, Region, Update};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::render::HtmlSurface;
use crate::routes::present;
use crate::state::AppState;

/// Add to cart form data. Quantity defaults to one.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    #[serde(default)]
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    #[serde(default)]
    pub product_id: String,
}

/// The product id a cart form names. Blank or missing is a bad request.
fn required_id(product_id: &str) -> Result<&str> {
    let id = product_id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_string()));
    }
    Ok(id)
}

/// Cart lines and subtotal.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Html<String>> {
    let mut session = state.session()?;
    session.refresh();
    let mut surface = HtmlSurface::inline(state.config().timing.notice_ttl);
    session.render(Region::CartLines, &mut surface)?;
    session.render(Region::CartSubtotal, &mut surface)?;
    Ok(Html(surface.into_html()))
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Html<String>> {
    let mut session = state.session()?;
    session.refresh();
    let mut surface = HtmlSurface::inline(state.config().timing.notice_ttl);
    session.render(Region::CartBadge, &mut surface)?;
    Ok(Html(surface.into_html()))
}

/// Add a catalog product to the cart.
///
/// An unknown product leaves the cart alone and shows an error notice.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Html<String>> {
    let id = required_id(&form.product_id)?;
    let mut session = state.session()?;
    let quantity = form.quantity.unwrap_or(1);

    let update = match session.add_to_cart(id, quantity) {
        Ok(update) => {
            add_breadcrumb("cart", "Added to cart", &[("product_id", id)]);
            update
        }
        Err(e) => Update::none().with_notice(Notice::error(e.to_string())),
    };

    present(&state, &session, &update)
}

/// Increase or decrease a line's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Html<String>> {
    let id = required_id(&form.product_id)?;
    let mut session = state.session()?;
    let update = session.change_quantity(id, form.delta);
    present(&state, &session, &update)
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Html<String>> {
    let id = required_id(&form.product_id)?;
    let mut session = state.session()?;
    let update = session.remove_item(id);
    if update.is_dirty(Region::CartLines) {
        add_breadcrumb("cart", "Removed from cart", &[("product_id", id)]);
    }
    present(&state, &session, &update)
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Html<String>> {
    let mut session = state.session()?;
    let update = session.clear();
    present(&state, &session, &update)
}
