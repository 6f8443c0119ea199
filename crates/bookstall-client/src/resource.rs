//! Remote resource contracts.
//!
//! The transport itself is out of scope; these traits are the exact
//! surface the services consume, and anything that speaks them (an HTTP
//! client, an in-memory fake) can be injected.

use async_trait::async_trait;
use bookstall_commerce::cart::ImageRef;
use bookstall_commerce::ids::{BookId, LineId, OrderId, UserId};
use bookstall_commerce::order::{Order, OrderStatus, RawOrder};
use bookstall_commerce::Money;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A cart line as stored by the cart resource: ownership, item, and
/// quantity only. Display data comes from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    /// Line identifier.
    pub id: LineId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced catalog item.
    pub book_id: BookId,
    /// Quantity, >= 1.
    pub quantity: i64,
}

/// Display data resolved from the catalog for one book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookInfo {
    /// Book title.
    pub title: String,
    /// Unit price in minor units.
    pub unit_price: Money,
    /// Cover image.
    pub image: Option<ImageRef>,
}

/// Generic CRUD over the remote cart resource.
#[async_trait]
pub trait CartResource: Send + Sync {
    /// List all cart entries for a user.
    async fn list(&self, user: &UserId) -> Result<Vec<CartEntry>, ClientError>;

    /// Create a new cart entry, returning the stored form.
    async fn create(&self, entry: &CartEntry) -> Result<CartEntry, ClientError>;

    /// Patch an entry's quantity, returning the server-confirmed value.
    async fn patch_quantity(&self, line: &LineId, quantity: i64) -> Result<i64, ClientError>;

    /// Delete an entry.
    async fn delete(&self, line: &LineId) -> Result<(), ClientError>;
}

/// Catalog lookup for cart-line enrichment.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolve display data for a book. A failure here degrades the
    /// affected line to a placeholder, never the whole cart.
    async fn lookup(&self, book: &BookId) -> Result<BookInfo, ClientError>;
}

/// Remote order resource.
#[async_trait]
pub trait OrderResource: Send + Sync {
    /// List all orders for a user, unvalidated.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<RawOrder>, ClientError>;

    /// Fetch one order by id, unvalidated.
    async fn get(&self, id: &OrderId) -> Result<Option<RawOrder>, ClientError>;

    /// Persist a newly placed order.
    async fn create(&self, order: &Order) -> Result<(), ClientError>;

    /// Patch an order's status.
    async fn patch_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        note: Option<String>,
    ) -> Result<(), ClientError>;
}
