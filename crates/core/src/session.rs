//! The store controller: one shopper's catalog view, cart and checkout.
//!
//! A [`StoreSession`] owns all mutable state and the key-value slot it
//! persists to. Operations are synchronous and return an [`Update`] naming
//! the regions that need redrawing, which an adapter hands back to
//! [`StoreSession::present`] together with its [`RenderSurface`].

use chrono::{DateTime, Utc};

use crate::cart::{Cart, CartError};
use crate::catalog::{Catalog, FilterState, Product};
use crate::checkout::{CheckoutOutcome, CheckoutRejection, Order, OrderIdGenerator};
use crate::render::{CART_REGIONS, CartLineView, Notice, ProductCard, Region, RenderSurface};
use crate::storage::KeyValueStore;
use crate::types::{CheckoutForm, CustomerDetails, Price, ProductId};

/// Key of the persisted cart snapshot.
pub const STORAGE_KEY: &str = "asn_store_cart_v1";

/// What changed as the result of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    pub dirty: Vec<Region>,
    pub notice: Option<Notice>,
}

impl Update {
    /// Nothing to redraw.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            dirty: Vec::new(),
            notice: None,
        }
    }

    #[must_use]
    pub fn regions(regions: &[Region]) -> Self {
        Self {
            dirty: regions.to_vec(),
            notice: None,
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    #[must_use]
    pub fn is_dirty(&self, region: Region) -> bool {
        self.dirty.contains(&region)
    }
}

/// Catalog, cart and checkout state for one shopper.
pub struct StoreSession<S> {
    catalog: Catalog,
    cart: Cart,
    filter: FilterState,
    store: S,
    key: String,
    order_ids: OrderIdGenerator,
}

impl<S: KeyValueStore> StoreSession<S> {
    /// Open a session, restoring the cart from [`STORAGE_KEY`].
    #[must_use]
    pub fn open(catalog: Catalog, store: S) -> Self {
        Self::open_with_key(catalog, store, STORAGE_KEY)
    }

    /// Open a session whose cart lives under a custom key.
    #[must_use]
    pub fn open_with_key(catalog: Catalog, store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = read_cart(&store, &key).unwrap_or_default();
        tracing::debug!(
            key = %key,
            lines = cart.len(),
            items = cart.total_item_count(),
            "cart restored"
        );

        Self {
            catalog,
            cart,
            filter: FilterState::default(),
            store,
            key,
            order_ids: OrderIdGenerator::new(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the session and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Re-read the cart from the store.
    ///
    /// Another process may share the slot, so every cart mutation starts
    /// from the stored snapshot. An unreadable store keeps the cart in memory.
    pub fn refresh(&mut self) {
        if let Some(cart) = read_cart(&self.store, &self.key) {
            self.cart = cart;
        }
    }

    // =========================================================================
    // Cart Model
    // =========================================================================

    /// Add `quantity` of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if `id` is not in the catalog.
    /// The cart and the store are left untouched.
    pub fn add_to_cart(&mut self, id: &str, quantity: u32) -> Result<Update, CartError> {
        if !self.catalog.contains(id) {
            tracing::warn!(product_id = %id, "add to cart for unknown product");
            return Err(CartError::UnknownProduct(ProductId::new(id)));
        }
        self.refresh();
        if !self.cart.add(ProductId::new(id), quantity) {
            return Ok(Update::none());
        }

        tracing::debug!(product_id = %id, quantity, "added to cart");
        self.persist();
        Ok(Update::regions(CART_REGIONS).with_notice(Notice::success("Added to cart")))
    }

    /// Adjust a line's quantity, removing it once it reaches zero.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> Update {
        self.refresh();
        if !self.cart.change_quantity(id, delta) {
            return Update::none();
        }

        tracing::debug!(product_id = %id, delta, "cart quantity changed");
        self.persist();
        Update::regions(CART_REGIONS)
    }

    /// Remove a line from the cart.
    pub fn remove_item(&mut self, id: &str) -> Update {
        self.refresh();
        if !self.cart.remove(id) {
            return Update::none();
        }

        tracing::debug!(product_id = %id, "removed from cart");
        self.persist();
        Update::regions(CART_REGIONS)
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Update {
        self.cart.clear();
        self.persist();
        Update::regions(CART_REGIONS)
    }

    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.cart.total_item_count()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal(&self.catalog)
    }

    fn persist(&mut self) {
        let snapshot = match self.cart.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &snapshot) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }

    // =========================================================================
    // Catalog View
    // =========================================================================

    /// Replace the active search, category and sort.
    pub fn set_filter(&mut self, filter: FilterState) -> Update {
        if filter == self.filter {
            return Update::none();
        }
        self.filter = filter;
        Update::regions(&[Region::ProductGrid])
    }

    /// Products matching the active filter, in display order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.catalog.apply_filters(&self.filter)
    }

    #[must_use]
    pub fn product_cards(&self) -> Vec<ProductCard> {
        self.visible_products()
            .into_iter()
            .map(|p| ProductCard::new(p, &self.catalog))
            .collect()
    }

    #[must_use]
    pub fn cart_line_views(&self) -> Vec<CartLineView> {
        self.cart
            .lines()
            .map(|line| CartLineView::new(line, &self.catalog))
            .collect()
    }

    #[must_use]
    pub fn formatted_subtotal(&self) -> String {
        self.catalog.currency().format(self.subtotal())
    }

    // =========================================================================
    // Checkout Simulator
    // =========================================================================

    /// Validate the form and, if complete, place a simulated order.
    ///
    /// A rejected submission changes nothing. An accepted one snapshots the
    /// cart into an [`Order`] and clears the cart.
    pub fn submit_checkout(&mut self, form: &CheckoutForm, now: DateTime<Utc>) -> CheckoutOutcome {
        let customer = match CustomerDetails::parse(form) {
            Ok(customer) => customer,
            Err(e) => {
                tracing::debug!(error = %e, "checkout rejected");
                return CheckoutOutcome::Rejected(CheckoutRejection::from(e));
            }
        };

        self.refresh();
        let id = self.order_ids.next_id(now);
        let order = Order::from_cart(id, &self.cart, &self.catalog, customer, now);
        tracing::info!(
            order_id = %order.id,
            lines = order.lines.len(),
            items = order.item_count(),
            total = order.total.minor_units(),
            "order created"
        );

        self.cart.clear();
        self.persist();
        CheckoutOutcome::Accepted(order)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Draw one region from current state.
    ///
    /// # Errors
    ///
    /// Propagates the surface's error.
    pub fn render<R: RenderSurface>(&self, region: Region, surface: &mut R) -> Result<(), R::Error> {
        match region {
            Region::ProductGrid => surface.product_grid(&self.product_cards()),
            Region::CartBadge => surface.cart_badge(self.total_item_count()),
            Region::CartLines => surface.cart_lines(&self.cart_line_views()),
            Region::CartSubtotal => surface.cart_subtotal(&self.formatted_subtotal()),
            Region::CheckoutForm => surface.reset_checkout_form(),
        }
    }

    /// Draw every region that holds state (all but the checkout form).
    ///
    /// # Errors
    ///
    /// Propagates the surface's error.
    pub fn render_all<R: RenderSurface>(&self, surface: &mut R) -> Result<(), R::Error> {
        self.render(Region::ProductGrid, surface)?;
        for region in CART_REGIONS {
            self.render(*region, surface)?;
        }
        Ok(())
    }

    /// Draw the regions an [`Update`] marked dirty, then its notice.
    ///
    /// # Errors
    ///
    /// Propagates the surface's error.
    pub fn present<R: RenderSurface>(&self, update: &Update, surface: &mut R) -> Result<(), R::Error> {
        for region in &update.dirty {
            self.render(*region, surface)?;
        }
        if let Some(notice) = &update.notice {
            surface.notice(notice)?;
        }
        Ok(())
    }
}

/// Regions and notice to show after a checkout submission.
#[must_use]
pub fn checkout_update(outcome: &CheckoutOutcome) -> Update {
    match outcome {
        CheckoutOutcome::Rejected(_) => Update::none().with_notice(Notice::error(outcome.message())),
        CheckoutOutcome::Accepted(_) => {
            let mut update = Update::regions(CART_REGIONS);
            update.dirty.push(Region::CheckoutForm);
            update.with_notice(Notice::success(outcome.message()))
        }
    }
}

/// Read the cart snapshot. A missing or corrupt snapshot is an empty cart;
/// `None` means the store itself could not be read.
fn read_cart<S: KeyValueStore>(store: &S, key: &str) -> Option<Cart> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Some(Cart::new()),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "could not read cart");
            return None;
        }
    };

    Some(Cart::from_snapshot(&raw).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "could not load cart, starting empty");
        Cart::new()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeZone;

    use super::*;
    use crate::catalog::SortMode;
    use crate::render::NoticeKind;
    use crate::storage::{MemoryStore, StorageError};

    fn session() -> StoreSession<MemoryStore> {
        StoreSession::open(Catalog::sample(), MemoryStore::new())
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    /// Records every call so tests can assert on what was drawn.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl RenderSurface for Recorder {
        type Error = std::convert::Infallible;

        fn product_grid(&mut self, cards: &[ProductCard]) -> Result<(), Self::Error> {
            let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
            self.calls.push(format!("grid:{}", ids.join(",")));
            Ok(())
        }

        fn cart_badge(&mut self, count: u32) -> Result<(), Self::Error> {
            self.calls.push(format!("badge:{count}"));
            Ok(())
        }

        fn cart_lines(&mut self, lines: &[CartLineView]) -> Result<(), Self::Error> {
            let rows: Vec<String> = lines
                .iter()
                .map(|l| format!("{}x{}", l.product_id, l.quantity))
                .collect();
            self.calls.push(format!("lines:{}", rows.join(",")));
            Ok(())
        }

        fn cart_subtotal(&mut self, subtotal: &str) -> Result<(), Self::Error> {
            self.calls.push(format!("subtotal:{subtotal}"));
            Ok(())
        }

        fn reset_checkout_form(&mut self) -> Result<(), Self::Error> {
            self.calls.push("form:reset".to_string());
            Ok(())
        }

        fn notice(&mut self, notice: &Notice) -> Result<(), Self::Error> {
            self.calls.push(format!("notice:{}", notice.message));
            Ok(())
        }
    }

    /// A store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }
    }

    /// Two handles onto one slot, like two processes sharing a cart file.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    #[test]
    fn test_add_persists_snapshot() {
        let mut s = session();
        let update = s.add_to_cart("p1", 2).unwrap();

        assert_eq!(update.dirty, CART_REGIONS);
        assert_eq!(update.notice.unwrap().kind, NoticeKind::Success);
        assert_eq!(
            s.store().get(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"p1":{"id":"p1","quantity":2}}"#)
        );
    }

    #[test]
    fn test_add_unknown_product_is_rejected() {
        let mut s = session();
        let err = s.add_to_cart("nope", 1).unwrap_err();
        assert_eq!(err, CartError::UnknownProduct(ProductId::new("nope")));
        assert!(s.cart().is_empty());
        assert_eq!(s.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let mut s = session();
        s.add_to_cart("p2", 1).unwrap();
        let update = s.change_quantity("p2", -1);
        assert!(update.is_dirty(Region::CartLines));
        assert!(s.cart().is_empty());
        assert_eq!(s.store().get(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_change_quantity_absent_does_nothing() {
        let mut s = session();
        assert_eq!(s.change_quantity("p2", 1), Update::none());
        assert_eq!(s.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut s = session();
        s.add_to_cart("p1", 1).unwrap();
        s.add_to_cart("p3", 1).unwrap();

        s.remove_item("p1");
        assert_eq!(s.total_item_count(), 1);

        s.clear();
        assert!(s.cart().is_empty());
        assert_eq!(s.store().get(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_reopen_restores_cart() {
        let mut s = session();
        s.add_to_cart("p4", 1).unwrap();
        s.add_to_cart("p1", 3).unwrap();
        s.change_quantity("p4", 2);
        let before = s.cart().clone();

        let reopened = StoreSession::open(Catalog::sample(), s.into_store());
        assert_eq!(reopened.cart(), &before);
    }

    #[test]
    fn test_mutations_keep_writes_from_another_session() {
        let store = SharedStore::default();
        let mut terminal = StoreSession::open(Catalog::sample(), store.clone());
        let mut browser = StoreSession::open(Catalog::sample(), store.clone());

        terminal.add_to_cart("p1", 3).unwrap();
        browser.add_to_cart("p2", 1).unwrap();
        terminal.change_quantity("p2", 1);

        let reopened = StoreSession::open(Catalog::sample(), store);
        let lines: Vec<(&str, u32)> = reopened
            .cart()
            .lines()
            .map(|l| (l.id.as_str(), l.quantity))
            .collect();
        assert_eq!(lines, [("p1", 3), ("p2", 2)]);
    }

    #[test]
    fn test_checkout_orders_the_stored_cart() {
        let store = SharedStore::default();
        let mut terminal = StoreSession::open(Catalog::sample(), store.clone());
        let mut browser = StoreSession::open(Catalog::sample(), store);

        terminal.add_to_cart("p5", 2).unwrap();
        let outcome = browser.submit_checkout(&CheckoutForm::new("Asha", "98450", "MG Road"), now());
        let CheckoutOutcome::Accepted(order) = &outcome else {
            panic!("expected accepted checkout, got {outcome:?}");
        };
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total, Price::new(498));
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        for raw in ["{not json", "[1,2,3]", r#"{"p1":{"id":"p1"}}"#, "42"] {
            let store = MemoryStore::with_entry(STORAGE_KEY, raw);
            let s = StoreSession::open(Catalog::sample(), store);
            assert!(s.cart().is_empty(), "loaded {raw:?}");
        }
    }

    #[test]
    fn test_unreadable_store_loads_empty_and_keeps_working() {
        let mut s = StoreSession::open(Catalog::sample(), BrokenStore);
        assert!(s.cart().is_empty());
        s.add_to_cart("p1", 1).unwrap();
        assert_eq!(s.total_item_count(), 1);
    }

    #[test]
    fn test_stale_line_is_tolerated() {
        let store = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"{"gone":{"id":"gone","quantity":2},"p5":{"id":"p5","quantity":1}}"#,
        );
        let s = StoreSession::open(Catalog::sample(), store);

        assert_eq!(s.total_item_count(), 3);
        assert_eq!(s.subtotal(), Price::new(249));

        let views = s.cart_line_views();
        assert_eq!(views[0].title, "gone");
        assert_eq!(views[0].image_ref, crate::render::PLACEHOLDER_IMAGE);
        assert_eq!(views[0].line_total, "₹0");
    }

    #[test]
    fn test_blank_checkout_is_rejected_and_cart_unchanged() {
        let mut s = session();
        s.add_to_cart("p2", 1).unwrap();
        let before = s.cart().clone();

        let outcome = s.submit_checkout(&CheckoutForm::new("", " ", ""), now());
        assert!(matches!(
            outcome,
            CheckoutOutcome::Rejected(CheckoutRejection::MissingFields(ref f)) if f.len() == 3
        ));
        assert_eq!(s.cart(), &before);

        let update = checkout_update(&outcome);
        assert!(update.dirty.is_empty());
        assert_eq!(update.notice.unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_complete_checkout_clears_cart() {
        let mut s = session();
        s.add_to_cart("p1", 2).unwrap();
        s.add_to_cart("p3", 1).unwrap();
        let subtotal = s.subtotal();

        let outcome = s.submit_checkout(&CheckoutForm::new("Asha", "98450", "MG Road"), now());
        let CheckoutOutcome::Accepted(order) = &outcome else {
            panic!("expected accepted checkout, got {outcome:?}");
        };

        assert_eq!(order.total, subtotal);
        assert_eq!(order.id.as_str(), "ORD1700000000000");
        assert_eq!(order.customer.name(), "Asha");
        assert!(s.cart().is_empty());
        assert_eq!(s.store().get(STORAGE_KEY).unwrap().as_deref(), Some("{}"));

        let update = checkout_update(&outcome);
        assert!(update.is_dirty(Region::CheckoutForm));
        assert_eq!(update.notice.unwrap().message, "Order placed! ORD1700000000000");
    }

    #[test]
    fn test_set_filter_marks_grid_dirty_once() {
        let mut s = session();
        let filter = FilterState::new("", "Clothing", SortMode::PriceAscending);
        assert_eq!(s.set_filter(filter.clone()).dirty, [Region::ProductGrid]);
        assert_eq!(s.set_filter(filter), Update::none());

        let ids: Vec<&str> = s.visible_products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p4"]);
    }

    #[test]
    fn test_present_draws_dirty_regions_then_notice() {
        let mut s = session();
        let update = s.add_to_cart("p5", 2).unwrap();

        let mut recorder = Recorder::default();
        s.present(&update, &mut recorder).unwrap();
        assert_eq!(
            recorder.calls,
            ["badge:2", "lines:p5x2", "subtotal:₹498", "notice:Added to cart"]
        );
    }

    #[test]
    fn test_render_all_is_idempotent() {
        let mut s = session();
        s.add_to_cart("p1", 1).unwrap();

        let mut first = Recorder::default();
        let mut second = Recorder::default();
        s.render_all(&mut first).unwrap();
        s.render_all(&mut second).unwrap();

        assert_eq!(first.calls, second.calls);
        assert_eq!(first.calls[0], "grid:p1,p2,p3,p4,p5");
    }
}
