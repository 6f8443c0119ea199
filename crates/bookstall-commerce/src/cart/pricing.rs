//! Cart pricing calculations.
//!
//! [`compute_totals`] is a pure function over a snapshot of cart lines
//! and a selection. It has no side effects and no I/O; identical inputs
//! always produce identical output.

use crate::cart::line::CartLine;
use crate::cart::voucher::Voucher;
use crate::error::CommerceError;
use crate::ids::LineId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shipping fee policy: a flat fee waived at or above a subtotal
/// threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free.
    pub threshold_amount: Money,
    /// Flat fee charged below the threshold.
    pub fee_below_threshold: Money,
}

impl ShippingPolicy {
    /// Create a new shipping policy.
    pub fn new(threshold_amount: Money, fee_below_threshold: Money) -> Self {
        Self {
            threshold_amount,
            fee_below_threshold,
        }
    }

    /// Fee for a given subtotal.
    pub fn fee_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.threshold_amount {
            Money::zero()
        } else {
            self.fee_below_threshold
        }
    }
}

/// The subset of cart lines a caller designates for pricing or checkout.
///
/// `All` is the full-cart view (no selection in play); `Only` with an
/// empty set genuinely means nothing is selected and prices to zero.
/// Keeping the two distinct prevents a caller from silently charging for
/// unselected lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Price the entire cart.
    All,
    /// Price only the named lines.
    Only(HashSet<LineId>),
}

impl Selection {
    /// Build a selection from an id iterator.
    pub fn of(ids: impl IntoIterator<Item = LineId>) -> Self {
        Selection::Only(ids.into_iter().collect())
    }

    /// Whether a line is in this selection.
    pub fn contains(&self, id: &LineId) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(ids) => ids.contains(id),
        }
    }
}

/// Complete pricing breakdown for a selection of cart lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    /// Sum of unit price times quantity over selected lines.
    pub subtotal: Money,
    /// Shipping fee for this subtotal.
    pub shipping_cost: Money,
    /// Voucher discount applied.
    pub discount: Money,
    /// Final total, clamped at zero.
    pub total: Money,
    /// Number of lines counted into the subtotal.
    pub selected_count: usize,
}

/// Compute subtotal, shipping, discount, and total for the selected
/// subset of `lines`.
pub fn compute_totals(
    lines: &[CartLine],
    selection: &Selection,
    policy: &ShippingPolicy,
    voucher: Option<&Voucher>,
) -> Result<Totals, CommerceError> {
    let mut subtotal = Money::zero();
    let mut selected_count = 0usize;

    for line in lines {
        if !selection.contains(&line.id) {
            continue;
        }
        subtotal = subtotal
            .checked_add(line.subtotal()?)
            .ok_or(CommerceError::Overflow)?;
        selected_count += 1;
    }

    let shipping_cost = policy.fee_for(subtotal);

    let discount = match voucher {
        Some(v) => v.discount_for(subtotal)?,
        None => Money::zero(),
    };

    let total = subtotal
        .checked_add(shipping_cost)
        .and_then(|t| t.checked_sub(discount))
        .ok_or(CommerceError::Overflow)?
        .clamp_non_negative();

    Ok(Totals {
        subtotal,
        shipping_cost,
        discount,
        total,
        selected_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{BookId, UserId};

    fn line(id: &str, quantity: i64, unit_price: i64) -> CartLine {
        let mut l = CartLine::new(
            UserId::new("u1"),
            BookId::new(format!("book-{id}")),
            quantity,
            Money::new(unit_price),
            format!("Book {id}"),
        )
        .unwrap();
        l.id = LineId::new(id);
        l
    }

    fn policy() -> ShippingPolicy {
        ShippingPolicy::new(Money::new(45_000), Money::new(15_000))
    }

    #[test]
    fn test_shipping_fee_below_threshold() {
        // One unit below the threshold pays the full fee
        let lines = [line("a", 1, 44_999)];
        let totals = compute_totals(&lines, &Selection::All, &policy(), None).unwrap();
        assert_eq!(totals.shipping_cost, Money::new(15_000));
    }

    #[test]
    fn test_shipping_fee_waived_at_threshold() {
        let lines = [line("a", 1, 45_000)];
        let totals = compute_totals(&lines, &Selection::All, &policy(), None).unwrap();
        assert_eq!(totals.shipping_cost, Money::zero());
    }

    #[test]
    fn test_selection_scopes_subtotal() {
        // Line A: qty 2 x 20 000, line B: qty 1 x 30 000
        let lines = [line("a", 2, 20_000), line("b", 1, 30_000)];

        let only_a = Selection::of([LineId::new("a")]);
        let totals = compute_totals(&lines, &only_a, &policy(), None).unwrap();
        assert_eq!(totals.subtotal, Money::new(40_000));
        assert_eq!(totals.shipping_cost, Money::new(15_000));
        assert_eq!(totals.total, Money::new(55_000));
        assert_eq!(totals.selected_count, 1);

        let both = Selection::of([LineId::new("a"), LineId::new("b")]);
        let totals = compute_totals(&lines, &both, &policy(), None).unwrap();
        assert_eq!(totals.subtotal, Money::new(70_000));
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.total, Money::new(70_000));
        assert_eq!(totals.selected_count, 2);
    }

    #[test]
    fn test_empty_only_selection_prices_to_zero_goods() {
        let lines = [line("a", 2, 20_000)];
        let totals =
            compute_totals(&lines, &Selection::Only(HashSet::new()), &policy(), None).unwrap();
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.selected_count, 0);
    }

    #[test]
    fn test_all_selection_prices_whole_cart() {
        let lines = [line("a", 2, 20_000), line("b", 1, 30_000)];
        let totals = compute_totals(&lines, &Selection::All, &policy(), None).unwrap();
        assert_eq!(totals.subtotal, Money::new(70_000));
    }

    #[test]
    fn test_voucher_cap_in_totals() {
        let lines = [line("a", 5, 20_000)]; // subtotal 100 000
        let voucher = Voucher::percentage("SAVE10", 10).with_max_discount(Money::new(5_000));
        let totals = compute_totals(&lines, &Selection::All, &policy(), Some(&voucher)).unwrap();
        assert_eq!(totals.discount, Money::new(5_000));
        assert_eq!(totals.total, Money::new(95_000));
    }

    #[test]
    fn test_voucher_below_min_order_value_in_totals() {
        let lines = [line("a", 2, 20_000)]; // subtotal 40 000
        let voucher = Voucher::percentage("SAVE10", 10).with_min_order_value(Money::new(50_000));
        let totals = compute_totals(&lines, &Selection::All, &policy(), Some(&voucher)).unwrap();
        assert_eq!(totals.discount, Money::zero());
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let lines = [line("a", 1, 1_000)];
        let voucher = Voucher::fixed("BIG", Money::new(50_000));
        let totals = compute_totals(&lines, &Selection::All, &policy(), Some(&voucher)).unwrap();
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let lines = [line("a", 2, 20_000), line("b", 1, 30_000)];
        let sel = Selection::of([LineId::new("a"), LineId::new("b")]);
        let first = compute_totals(&lines, &sel, &policy(), None).unwrap();
        let second = compute_totals(&lines, &sel, &policy(), None).unwrap();
        assert_eq!(first, second);
    }
}
