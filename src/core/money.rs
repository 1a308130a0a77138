//! Integer money amounts and currency conversion
//!
//! All shipping arithmetic runs on [`Money`], a count of minor currency units
//! (cents, đồng, ...). Floating point only appears when an amount is scaled by
//! a physical quantity (kilograms, kilometers) or a multiplier, and the result
//! is rounded back to minor units immediately.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A non-negative amount expressed in minor currency units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build an amount from minor units
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Raw minor units
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Multiply by a real factor, rounding half away from zero
    ///
    /// Negative or NaN products clamp to zero and oversized products saturate,
    /// so the result is always a valid amount.
    pub fn scale(self, factor: f64) -> Money {
        let product = (self.0 as f64 * factor).round();
        if product.is_nan() || product <= 0.0 {
            Money::ZERO
        } else {
            // `as` saturates at u64::MAX for out-of-range floats
            Money(product as u64)
        }
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.saturating_add(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Money {
    fn from(minor: u64) -> Self {
        Money(minor)
    }
}

/// The single currency the storefront trades in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code (e.g., "VND", "USD")
    pub code: String,

    /// How many minor units make one major unit (1 for VND, 100 for USD)
    #[serde(default = "default_minor_units")]
    pub minor_units_per_major: u32,
}

fn default_minor_units() -> u32 {
    1
}

impl Currency {
    pub fn new(code: impl Into<String>, minor_units_per_major: u32) -> Self {
        Self {
            code: code.into(),
            minor_units_per_major,
        }
    }

    /// Present an amount in major units
    pub fn to_major(&self, amount: Money) -> f64 {
        amount.minor() as f64 / self.minor_units_per_major.max(1) as f64
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("VND", 1)
    }
}
