//! Core value types for the ASN Store.
//!
//! This module provides type-safe wrappers for ids, money and customer details.

pub mod customer;
pub mod id;
pub mod price;

pub use customer::{CheckoutForm, CustomerDetails, CustomerError, CustomerField};
pub use id::*;
pub use price::{Currency, Price};
