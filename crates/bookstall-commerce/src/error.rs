//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and order domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Malformed mutation input, rejected before any state change.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Line not found in the cart.
    #[error("Line not in cart: {0}")]
    LineNotInCart(String),

    /// Illegal order-status change; order state is left untouched.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Fatal order data gap; the order cannot be displayed or operated on.
    #[error("Order is missing required data: {}", missing.join(", "))]
    MissingRequiredData { missing: Vec<String> },

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_lists_fields() {
        let err = CommerceError::MissingRequiredData {
            missing: vec!["total".to_string(), "createdAt".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Order is missing required data: total, createdAt"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = CommerceError::InvalidTransition {
            from: "shipping".to_string(),
            to: "cancelled".to_string(),
        };
        assert!(err.to_string().contains("shipping"));
        assert!(err.to_string().contains("cancelled"));
    }
}
