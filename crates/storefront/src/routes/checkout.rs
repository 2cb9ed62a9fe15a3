//! Checkout simulator handler.

use axum::{Form, extract::State, response::Html};
use chrono::Utc;
use tracing::instrument;

use asn_store_core::{CheckoutForm, CheckoutOutcome, checkout_update};

use crate::error::{Result, add_breadcrumb};
use crate::routes::present;
use crate::state::AppState;

/// Validate the customer details and place a simulated order.
///
/// Rejections keep the form as typed and show an error notice. Accepted
/// orders clear the cart and the form.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<Html<String>> {
    let mut session = state.session()?;
    let outcome = session.submit_checkout(&form, Utc::now());

    if let CheckoutOutcome::Accepted(order) = &outcome {
        add_breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);
    }

    present(&state, &session, &checkout_update(&outcome))
}
