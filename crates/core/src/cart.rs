//! The cart model: product id → quantity, plus its snapshot format.
//!
//! Every line holds a quantity of at least one. Operations that would take a
//! quantity to zero or below remove the line instead.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{Price, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

/// Errors raised by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// The shopping cart, keyed by product id in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: IndexMap<ProductId, CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &CartLine> {
        self.lines.values()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.get(id)
    }

    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.get(id).map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add `quantity` of a product, creating the line if needed.
    ///
    /// Returns `false` (and does nothing) when `quantity` is zero.
    pub fn add(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        self.lines
            .entry(id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(quantity))
            .or_insert_with_key(|id| CartLine {
                id: id.clone(),
                quantity,
            });
        true
    }

    /// Adjust a line's quantity by `delta`, removing it if the result is not
    /// positive.
    ///
    /// Returns `false` when the product is not in the cart or `delta` is zero.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> bool {
        if delta == 0 {
            return false;
        }
        let Some(line) = self.lines.get_mut(id) else {
            return false;
        };

        let next = i64::from(line.quantity).saturating_add(delta);
        if next <= 0 {
            self.lines.shift_remove(id);
        } else {
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.lines.shift_remove(id).is_some()
    }

    /// Empty the cart. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        had_lines
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of quantity × current catalog price. Lines for products missing
    /// from the catalog count as zero.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Price {
        self.lines
            .values()
            .map(|line| catalog.price_of(line.id.as_str()).times(line.quantity))
            .sum()
    }

    /// Serialize the cart to its persisted JSON form:
    /// `{"<product id>": {"id": "<product id>", "quantity": n}, ...}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Parse a persisted snapshot.
    ///
    /// Lines with a zero quantity are dropped, and the map key wins when it
    /// disagrees with a line's inner id.
    ///
    /// # Errors
    ///
    /// Returns an error if `snapshot` is not a JSON object of cart lines.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        let raw: IndexMap<String, CartLine> = serde_json::from_str(snapshot)?;

        let lines = raw
            .into_iter()
            .filter(|(key, line)| !key.is_empty() && line.quantity > 0)
            .map(|(key, line)| {
                let id = ProductId::new(key);
                (
                    id.clone(),
                    CartLine {
                        id,
                        quantity: line.quantity,
                    },
                )
            })
            .collect();

        Ok(Self { lines })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_creates_then_increments() {
        let mut cart = Cart::new();
        assert!(cart.add(pid("p1"), 1));
        assert!(cart.add(pid("p1"), 2));
        assert!(cart.add(pid("p2"), 1));

        assert_eq!(cart.quantity_of("p1"), 3);
        assert_eq!(cart.quantity_of("p2"), 1);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_item_count(), 4);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add(pid("p1"), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(pid("p1"), 2);

        assert!(cart.change_quantity("p1", -1));
        assert_eq!(cart.quantity_of("p1"), 1);

        assert!(cart.change_quantity("p1", -1));
        assert!(cart.get("p1").is_none());
    }

    #[test]
    fn test_change_quantity_large_negative_removes() {
        let mut cart = Cart::new();
        cart.add(pid("p1"), 2);
        assert!(cart.change_quantity("p1", -50));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.change_quantity("p9", 1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(pid("p1"), 1);
        cart.add(pid("p2"), 1);

        assert!(cart.remove("p1"));
        assert!(!cart.remove("p1"));
        assert!(cart.clear());
        assert!(!cart.clear());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = Cart::new();
        for id in ["p3", "p1", "p2"] {
            cart.add(pid(id), 1);
        }
        cart.remove("p1");
        let ids: Vec<&str> = cart.lines().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p2"]);
    }

    #[test]
    fn test_subtotal_ignores_unknown_products() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add(pid("p1"), 2);
        cart.add(pid("p5"), 1);
        cart.add(pid("ghost"), 4);
        assert_eq!(cart.subtotal(&catalog), Price::new(2 * 399 + 249));
    }

    #[test]
    fn test_snapshot_format() {
        let mut cart = Cart::new();
        cart.add(pid("p2"), 3);
        assert_eq!(
            cart.to_snapshot().unwrap(),
            r#"{"p2":{"id":"p2","quantity":3}}"#
        );
    }

    #[test]
    fn test_snapshot_accepts_legacy_qty() {
        let cart = Cart::from_snapshot(r#"{"p1":{"id":"p1","qty":2}}"#).unwrap();
        assert_eq!(cart.quantity_of("p1"), 2);
    }

    #[test]
    fn test_snapshot_normalizes_lines() {
        let cart = Cart::from_snapshot(
            r#"{"p1":{"id":"p1","quantity":0},"p2":{"id":"other","quantity":1}}"#,
        )
        .unwrap();
        assert!(cart.get("p1").is_none());
        assert_eq!(cart.get("p2").unwrap().id.as_str(), "p2");
    }

    #[test]
    fn test_snapshot_rejects_incompatible_shapes() {
        for bad in [
            "",
            "null",
            "[]",
            "not json",
            r#"{"p1":{"id":"p1","quantity":-1}}"#,
            r#"{"p1":3}"#,
        ] {
            assert!(Cart::from_snapshot(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, u32),
        Change(usize, i64),
        Remove(usize),
    }

    const IDS: [&str; 6] = ["p1", "p2", "p3", "p4", "p5", "ghost"];

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..IDS.len(), 0u32..5).prop_map(|(i, q)| Op::Add(i, q)),
            (0..IDS.len(), -6i64..6).prop_map(|(i, d)| Op::Change(i, d)),
            (0..IDS.len()).prop_map(Op::Remove),
        ]
    }

    fn apply(cart: &mut Cart, op: &Op) {
        match *op {
            Op::Add(i, q) => {
                cart.add(pid(IDS[i]), q);
            }
            Op::Change(i, d) => {
                cart.change_quantity(IDS[i], d);
            }
            Op::Remove(i) => {
                cart.remove(IDS[i]);
            }
        }
    }

    proptest! {
        /// No operation sequence leaves a non-positive quantity behind.
        #[test]
        fn prop_quantities_stay_positive(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
                prop_assert!(cart.lines().all(|line| line.quantity >= 1));
            }
        }

        /// Subtotal equals the sum of quantity × price over resolvable lines.
        #[test]
        fn prop_subtotal_matches_lines(ops in prop::collection::vec(arb_op(), 0..64)) {
            let catalog = Catalog::sample();
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
            }

            let expected: i64 = cart
                .lines()
                .filter_map(|line| {
                    catalog
                        .get(line.id.as_str())
                        .map(|p| p.price.minor_units() * i64::from(line.quantity))
                })
                .sum();
            prop_assert_eq!(cart.subtotal(&catalog).minor_units(), expected);
        }

        /// Snapshots of carts built through the public operations round-trip.
        #[test]
        fn prop_snapshot_roundtrip(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
            }

            let restored = Cart::from_snapshot(&cart.to_snapshot().unwrap()).unwrap();
            prop_assert_eq!(&restored, &cart);
            let order: Vec<&str> = restored.lines().map(|l| l.id.as_str()).collect();
            let expected: Vec<&str> = cart.lines().map(|l| l.id.as_str()).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
