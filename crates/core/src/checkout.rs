//! Simulated checkout: validation, order snapshots and order ids.
//!
//! Nothing here leaves the process. An accepted checkout yields an [`Order`]
//! value that the caller logs and shows; it is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::catalog::Catalog;
use crate::types::{CustomerDetails, CustomerError, CustomerField, OrderId, Price};

/// Prefix of generated order ids.
pub const ORDER_ID_PREFIX: &str = "ORD";

/// Why a checkout submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutRejection {
    #[error("Please fill all required fields")]
    MissingFields(Vec<CustomerField>),
}

impl From<CustomerError> for CheckoutRejection {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::MissingFields(fields) => Self::MissingFields(fields),
        }
    }
}

/// Result of one checkout submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Rejected(CheckoutRejection),
    Accepted(Order),
}

impl CheckoutOutcome {
    /// The user-facing message for this outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected(reason) => reason.to_string(),
            Self::Accepted(order) => format!("Order placed! {}", order.id),
        }
    }
}

/// An order receipt built from the cart at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub customer: CustomerDetails,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot the cart and price it against the catalog.
    #[must_use]
    pub fn from_cart(
        id: OrderId,
        cart: &Cart,
        catalog: &Catalog,
        customer: CustomerDetails,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            lines: cart.lines().cloned().collect(),
            total: cart.subtotal(catalog),
            customer,
            placed_at,
        }
    }

    /// Total number of items ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// Generates time-based order ids that are unique within a session.
///
/// Ids are `ORD` followed by Unix milliseconds. Two orders in the same
/// millisecond (or a clock that steps backwards) get the next free value.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    last: Option<i64>,
}

impl OrderIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Produce the id for an order placed at `now`.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> OrderId {
        let millis = now.timestamp_millis();
        let value = match self.last {
            Some(last) if millis <= last => last.saturating_add(1),
            _ => millis,
        };
        self.last = Some(value);
        OrderId::new(format!("{ORDER_ID_PREFIX}{value}"))
    }
}
