//! Client error types.

use bookstall_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur in client-side cart and order operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No authenticated user; all cart and order operations refuse.
    #[error("Authentication required")]
    AuthRequired,

    /// Transient transport failure. Mutations roll back and report once;
    /// there is no automatic retry.
    #[error("Network error: {0}")]
    Network(String),

    /// Handoff token absent or already consumed.
    #[error("Handoff token not found")]
    HandoffNotFound,

    /// Cart line not found.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A domain error surfaced from the commerce layer.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}
