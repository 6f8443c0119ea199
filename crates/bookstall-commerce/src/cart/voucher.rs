//! Voucher types and discount calculation.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How a voucher's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherKind {
    /// Percentage off the subtotal (value is 0..=100).
    Percentage,
    /// Fixed amount off, in minor units.
    Fixed,
}

/// A voucher definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voucher {
    /// Voucher code (e.g., "SAVE10").
    pub code: String,
    /// Kind of voucher.
    pub kind: VoucherKind,
    /// Percentage points or fixed minor-unit amount, per `kind`.
    pub value: i64,
    /// Minimum subtotal for the voucher to apply. Defaults to 0.
    #[serde(default)]
    pub min_order_value: Money,
    /// Cap on the discount amount, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
}

impl Voucher {
    /// Create a percentage voucher.
    pub fn percentage(code: impl Into<String>, value: i64) -> Self {
        Self {
            code: code.into(),
            kind: VoucherKind::Percentage,
            value,
            min_order_value: Money::zero(),
            max_discount: None,
        }
    }

    /// Create a fixed-amount voucher.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self {
            code: code.into(),
            kind: VoucherKind::Fixed,
            value: amount.minor,
            min_order_value: Money::zero(),
            max_discount: None,
        }
    }

    /// Require a minimum subtotal.
    pub fn with_min_order_value(mut self, min: Money) -> Self {
        self.min_order_value = min;
        self
    }

    /// Cap the discount amount.
    pub fn with_max_discount(mut self, cap: Money) -> Self {
        self.max_discount = Some(cap);
        self
    }

    /// Calculate the discount this voucher grants on a subtotal.
    ///
    /// Zero when the subtotal is below `min_order_value`; otherwise the
    /// percentage or fixed value, capped at `max_discount` when present.
    /// Integer arithmetic throughout.
    pub fn discount_for(&self, subtotal: Money) -> Result<Money, CommerceError> {
        if subtotal < self.min_order_value {
            return Ok(Money::zero());
        }

        let raw = match self.kind {
            VoucherKind::Percentage => subtotal
                .percent(self.value)
                .ok_or(CommerceError::Overflow)?,
            VoucherKind::Fixed => Money::new(self.value),
        };

        Ok(match self.max_discount {
            Some(cap) => raw.min(cap),
            None => raw,
        })
    }
}
