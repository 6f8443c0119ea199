//! Order status lifecycle.
//!
//! Legal transitions form a single forward chain with two cancellation
//! exits:
//!
//! ```text
//! pending -> confirmed -> preparing -> shipping -> delivered -> returned
//!    |            |
//!    +------------+--> cancelled
//! ```
//!
//! Any other attempt fails with `InvalidTransition` and leaves the order
//! untouched, history included.

use crate::error::CommerceError;
use crate::order::order::{current_timestamp, Order};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Order confirmed.
    Confirmed,
    /// Order being prepared.
    Preparing,
    /// Order in transit.
    Shipping,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Order returned after delivery.
    Returned,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Shipping => "Shipping",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        }
    }

    /// Whether a transition from `self` to `to` is legal.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, Shipping)
                | (Shipping, Delivered)
                | (Delivered, Returned)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    /// Check if order is in a terminal state.
    ///
    /// `Delivered` is not terminal only because `Returned` remains
    /// reachable from it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Returned)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in an order's append-only status history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    /// Status entered.
    pub status: OrderStatus,
    /// Unix timestamp of the transition.
    pub timestamp: i64,
    /// Optional operator note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Who performed the transition.
    pub updated_by: String,
}

/// Apply a status transition to an order.
///
/// On success the status changes, a history entry is appended, and the
/// per-status timestamp field is stamped. On failure the order is
/// returned untouched inside `InvalidTransition`.
pub fn transition(
    order: &mut Order,
    to: OrderStatus,
    note: Option<String>,
    updated_by: impl Into<String>,
) -> Result<(), CommerceError> {
    let from = order.status;
    if !from.can_transition_to(to) {
        return Err(CommerceError::InvalidTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }

    let now = current_timestamp();
    order.status = to;
    order.status_history.push(StatusHistoryEntry {
        status: to,
        timestamp: now,
        note,
        updated_by: updated_by.into(),
    });

    match to {
        OrderStatus::Confirmed => order.confirmed_at = Some(now),
        OrderStatus::Preparing => order.preparing_at = Some(now),
        OrderStatus::Shipping => order.shipped_at = Some(now),
        OrderStatus::Delivered => order.delivered_at = Some(now),
        OrderStatus::Cancelled => order.cancelled_at = Some(now),
        OrderStatus::Returned => order.returned_at = Some(now),
        OrderStatus::Pending => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use crate::money::Money;
    use crate::order::order::{PaymentDetails, Receiver, ShippingDetails};

    fn order() -> Order {
        Order::new(
            UserId::new("u1"),
            Receiver::default(),
            Vec::new(),
            ShippingDetails::default(),
            PaymentDetails::default(),
            Money::new(40_000),
            Money::new(15_000),
            Money::zero(),
            Money::new(55_000),
        )
    }

    #[test]
    fn test_forward_chain() {
        let mut o = order();
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Returned,
        ] {
            transition(&mut o, status, None, "staff").unwrap();
            assert_eq!(o.status, status);
        }
        // Initial pending entry plus five transitions
        assert_eq!(o.status_history.len(), 6);
        assert!(o.confirmed_at.is_some());
        assert!(o.shipped_at.is_some());
        assert!(o.delivered_at.is_some());
        assert!(o.returned_at.is_some());
    }

    #[test]
    fn test_cancel_from_pending_and_confirmed() {
        let mut o = order();
        transition(&mut o, OrderStatus::Cancelled, Some("changed mind".into()), "customer")
            .unwrap();
        assert_eq!(o.status, OrderStatus::Cancelled);
        assert!(o.cancelled_at.is_some());

        let mut o = order();
        transition(&mut o, OrderStatus::Confirmed, None, "staff").unwrap();
        transition(&mut o, OrderStatus::Cancelled, None, "customer").unwrap();
        assert_eq!(o.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_from_shipping_rejected_and_state_unchanged() {
        let mut o = order();
        transition(&mut o, OrderStatus::Confirmed, None, "staff").unwrap();
        transition(&mut o, OrderStatus::Preparing, None, "staff").unwrap();
        transition(&mut o, OrderStatus::Shipping, None, "staff").unwrap();
        let history_before = o.status_history.clone();

        let err = transition(&mut o, OrderStatus::Cancelled, None, "customer").unwrap_err();
        assert_eq!(
            err,
            CommerceError::InvalidTransition {
                from: "shipping".to_string(),
                to: "cancelled".to_string(),
            }
        );
        assert_eq!(o.status, OrderStatus::Shipping);
        assert_eq!(o.status_history, history_before);
        assert!(o.cancelled_at.is_none());
    }

    #[test]
    fn test_skipping_a_step_rejected() {
        let mut o = order();
        assert!(transition(&mut o, OrderStatus::Shipping, None, "staff").is_err());
        assert_eq!(o.status, OrderStatus::Pending);
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        let mut o = order();
        transition(&mut o, OrderStatus::Cancelled, None, "customer").unwrap();
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Returned,
        ] {
            assert!(transition(&mut o, status, None, "staff").is_err());
        }
    }

    #[test]
    fn test_returned_only_from_delivered() {
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Returned));
        assert!(!OrderStatus::Shipping.can_transition_to(OrderStatus::Returned));
        assert!(!OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Returned.is_terminal());
    }
}
