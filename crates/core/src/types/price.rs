//! Type-safe price representation.
//!
//! Prices are stored as an integer count of the currency's minor unit. The
//! [`Currency`] carries the exponent that relates minor units to the major
//! unit, and is only consulted when a price is displayed.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest minor-unit exponent a [`Currency`] may declare.
pub const MAX_EXPONENT: u32 = 4;

/// A monetary amount in minor currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Get the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Price of `quantity` items at this unit price, saturating on overflow.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Price {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

/// Display settings for the catalog's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 currency code.
    pub code: String,
    /// Symbol prefixed to formatted amounts.
    pub symbol: String,
    /// Number of minor-unit digits (0 for whole units, 2 for cents).
    #[serde(default)]
    pub exponent: u32,
}

impl Default for Currency {
    fn default() -> Self {
        Self::inr()
    }
}

impl Currency {
    /// Indian rupee priced in whole rupees.
    #[must_use]
    pub fn inr() -> Self {
        Self {
            code: "INR".to_string(),
            symbol: "₹".to_string(),
            exponent: 0,
        }
    }

    /// Convert a price into a decimal amount of major units.
    #[must_use]
    pub fn to_decimal(&self, price: Price) -> Decimal {
        Decimal::new(price.minor_units(), self.exponent.min(MAX_EXPONENT))
    }

    /// Format a price for display, e.g. `₹2,499` or `$24.99`.
    #[must_use]
    pub fn format(&self, price: Price) -> String {
        let precision = self.exponent.min(MAX_EXPONENT) as usize;
        let amount = format!("{:.precision$}", self.to_decimal(price).abs());

        let (whole, fraction) = amount
            .split_once('.')
            .map_or((amount.as_str(), None), |(w, f)| (w, Some(f)));

        let mut out = String::with_capacity(amount.len() + self.symbol.len() + 4);
        if price.minor_units() < 0 {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

/// Insert `,` separators every three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
