//! Order types.

use crate::cart::ImageRef;
use crate::ids::{BookId, OrderId, UserId};
use crate::money::Money;
use crate::order::lifecycle::{OrderStatus, StatusHistoryEntry};
use serde::{Deserialize, Serialize};

/// Receiver details for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Receiver {
    /// Recipient name.
    pub name: String,
    /// Delivery address.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
}

/// A product line captured into an order at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderProduct {
    /// Catalog item ID.
    pub id: BookId,
    /// Name at time of order.
    pub name: String,
    /// Unit price at time of order.
    pub price: Money,
    /// Quantity ordered.
    pub quantity: i64,
    /// Cover image, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Shipping details for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShippingDetails {
    /// Shipping method name.
    pub method: String,
    /// Shipping cost charged.
    pub cost: Money,
    /// Shipping discount applied.
    pub discount: Money,
    /// Estimated delivery date (unix seconds), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_date: Option<i64>,
}

/// Payment status for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment pending.
    #[default]
    Pending,
    /// Payment completed.
    Paid,
    /// Payment refunded.
    Refunded,
    /// Payment failed.
    Failed,
}

/// Payment details for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaymentDetails {
    /// Payment method name (e.g., "cod", "card").
    pub method: String,
    /// Payment status.
    pub status: PaymentStatus,
    /// Amount charged.
    pub amount: Money,
}

/// A placed order.
///
/// Orders are created on checkout submission, mutated only through
/// lifecycle transitions, and never deleted. A finished order sits in a
/// terminal status instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer user ID.
    pub user_id: UserId,
    /// Order status.
    pub status: OrderStatus,
    /// Receiver details.
    pub receiver: Receiver,
    /// Products in the order.
    pub products: Vec<OrderProduct>,
    /// Shipping details.
    pub shipping: ShippingDetails,
    /// Payment details.
    pub payment: PaymentDetails,
    /// Subtotal before discounts and shipping.
    pub sub_total: Money,
    /// Shipping cost charged.
    pub shipping_cost: Money,
    /// Total discount applied.
    pub total_discount: Money,
    /// Grand total charged.
    pub total: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Append-only log of status transitions.
    pub status_history: Vec<StatusHistoryEntry>,
    /// Unix timestamp when confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    /// Unix timestamp when preparation started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<i64>,
    /// Unix timestamp when shipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<i64>,
    /// Unix timestamp when delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    /// Unix timestamp when cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    /// Unix timestamp when returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<i64>,
}

impl Order {
    /// Create a new order in the initial `Pending` status.
    pub fn new(
        user_id: UserId,
        receiver: Receiver,
        products: Vec<OrderProduct>,
        shipping: ShippingDetails,
        payment: PaymentDetails,
        sub_total: Money,
        shipping_cost: Money,
        total_discount: Money,
        total: Money,
    ) -> Self {
        let now = current_timestamp();
        let placed_by = user_id.to_string();
        Self {
            id: OrderId::generate(),
            user_id,
            status: OrderStatus::Pending,
            receiver,
            products,
            shipping,
            payment,
            sub_total,
            shipping_cost,
            total_discount,
            total,
            created_at: now,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                note: None,
                updated_by: placed_by,
            }],
            confirmed_at: None,
            preparing_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            returned_at: None,
        }
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    /// Check if the order sits in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            UserId::new("u1"),
            Receiver {
                name: "An Nguyen".to_string(),
                address: "12 Tran Hung Dao".to_string(),
                phone: "0900000000".to_string(),
            },
            vec![OrderProduct {
                id: BookId::new("b1"),
                name: "A Book".to_string(),
                price: Money::new(20_000),
                quantity: 2,
                image: None,
            }],
            ShippingDetails::default(),
            PaymentDetails::default(),
            Money::new(40_000),
            Money::new(15_000),
            Money::zero(),
            Money::new(55_000),
        )
    }

    #[test]
    fn test_new_order_starts_pending_with_history() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.len(), 1);
        assert_eq!(order.status_history[0].status, OrderStatus::Pending);
    }

    #[test]
    fn test_item_count() {
        assert_eq!(sample_order().item_count(), 2);
    }
}
