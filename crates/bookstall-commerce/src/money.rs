//! Money type for representing monetary values.
//!
//! Amounts are stored as integers in the smallest currency unit. All
//! arithmetic is integer arithmetic; there is no floating-point path
//! anywhere in pricing, so identical inputs always produce identical
//! totals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in minor currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub minor: i64,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(minor: i64) -> Self {
        Self { minor }
    }

    /// Create a zero amount.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Checked addition.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.minor.checked_add(other.minor).map(Money::new)
    }

    /// Checked subtraction.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.minor.checked_sub(other.minor).map(Money::new)
    }

    /// Checked multiplication by a quantity.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.minor.checked_mul(factor).map(Money::new)
    }

    /// Integer percentage of this amount, truncating toward zero.
    ///
    /// `Money::new(10_000).percent(10)` is `Money::new(1_000)`.
    pub fn percent(&self, pct: i64) -> Option<Money> {
        self.minor.checked_mul(pct).map(|v| Money::new(v / 100))
    }

    /// The smaller of two amounts.
    pub fn min(self, other: Money) -> Money {
        Money::new(self.minor.min(other.minor))
    }

    /// Clamp a negative amount up to zero.
    pub fn clamp_non_negative(self) -> Money {
        Money::new(self.minor.max(0))
    }

    /// Sum an iterator of Money values, failing on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.checked_add(*m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minor)
    }
}
