//! Command implementations. Each runs one action against an open session and
//! prints the regions it changed.

pub mod cart;
pub mod catalog;
pub mod checkout;

use thiserror::Error;

use asn_store_core::{CartError, CheckoutRejection};

/// Why a command failed. The message has already been shown as a notice for
/// the shopper-facing variants; these exist so the process exits non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("checkout rejected: {0}")]
    CheckoutRejected(CheckoutRejection),
}

pub type Result<T = ()> = std::result::Result<T, CommandError>;
