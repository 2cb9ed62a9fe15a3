//! ASN Store Core - catalog, cart and checkout logic.
//!
//! This crate holds everything the store does, independent of how it is
//! displayed:
//! - `storefront` - Local HTML storefront (axum + HTMX)
//! - `cli` - Terminal front end over the same session
//!
//! # Architecture
//!
//! The core crate performs no I/O. Persistence goes through the
//! [`KeyValueStore`] trait and drawing goes through [`RenderSurface`], so the
//! whole store can be exercised in unit tests with [`MemoryStore`] and a
//! recording surface.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices and customer details
//! - [`catalog`] - Products, filtering and sorting
//! - [`cart`] - Cart lines and the persisted snapshot format
//! - [`checkout`] - Simulated checkout and order receipts
//! - [`session`] - The store controller tying the above together
//! - [`render`] - View data and the rendering boundary
//! - [`schedule`] - Debounce primitive for delayed UI work
//! - [`storage`] - The key-value slot abstraction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod render;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod types;

pub use cart::{Cart, CartError, CartLine};
pub use catalog::{Catalog, CatalogError, FilterState, Product, SortMode};
pub use checkout::{CheckoutOutcome, CheckoutRejection, Order, OrderIdGenerator};
pub use render::{CartLineView, Notice, NoticeKind, ProductCard, Region, RenderSurface};
pub use schedule::Debouncer;
pub use session::{STORAGE_KEY, StoreSession, Update, checkout_update};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use types::*;
