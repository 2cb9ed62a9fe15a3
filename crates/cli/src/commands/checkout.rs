//! Checkout command.

use std::io::Write;

use chrono::{DateTime, Utc};

use asn_store_core::{
    CheckoutForm, CheckoutOutcome, CheckoutRejection, KeyValueStore, StoreSession, checkout_update,
};

use super::{CommandError, Result};
use crate::surface::TextSurface;

/// Submit customer details and place a simulated order.
///
/// # Errors
///
/// Fails with [`CommandError::CheckoutRejected`] when a field is blank,
/// after printing the rejection notice.
pub fn submit<S: KeyValueStore, W: Write>(
    session: &mut StoreSession<S>,
    form: &CheckoutForm,
    now: DateTime<Utc>,
    out: &mut TextSurface<W>,
) -> Result {
    let outcome = session.submit_checkout(form, now);
    session.present(&checkout_update(&outcome), out)?;

    match outcome {
        CheckoutOutcome::Accepted(order) => {
            let total = session.catalog().currency().format(order.total);
            out.line(format_args!(
                "Order {}: {} item(s), total {total}",
                order.id,
                order.item_count()
            ))?;
            Ok(())
        }
        CheckoutOutcome::Rejected(rejection) => {
            let CheckoutRejection::MissingFields(fields) = &rejection;
            let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
            out.line(format_args!("Missing: {}", names.join(", ")))?;
            Err(CommandError::CheckoutRejected(rejection))
        }
    }
}
