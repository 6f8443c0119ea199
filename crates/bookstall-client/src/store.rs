//! Canonical cart snapshot and its remote round-trips.

use std::sync::Arc;

use bookstall_commerce::cart::{CartLine, MAX_QUANTITY_PER_LINE, PLACEHOLDER_TITLE};
use bookstall_commerce::ids::{BookId, LineId, UserId};
use bookstall_commerce::{CommerceError, Money};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::resource::{CartEntry, CartResource, CatalogLookup};

/// The canonical, per-user collection of cart lines.
///
/// Holds only the last-fetched snapshot; every mutation round-trips
/// through the cart resource. Pricing and optimistic display state are
/// layered on top by the service, never stored here.
pub struct CartStore {
    resource: Arc<dyn CartResource>,
    catalog: Arc<dyn CatalogLookup>,
    user: Option<UserId>,
    snapshot: Vec<CartLine>,
    next_fetch_seq: u64,
    applied_fetch_seq: u64,
}

impl CartStore {
    /// Create a store over the given resources.
    pub fn new(
        resource: Arc<dyn CartResource>,
        catalog: Arc<dyn CatalogLookup>,
        user: Option<UserId>,
    ) -> Self {
        Self {
            resource,
            catalog,
            user,
            snapshot: Vec::new(),
            next_fetch_seq: 0,
            applied_fetch_seq: 0,
        }
    }

    /// The authenticated user, or `AuthRequired`.
    pub fn require_user(&self) -> Result<&UserId, ClientError> {
        self.user.as_ref().ok_or(ClientError::AuthRequired)
    }

    /// The last-fetched snapshot.
    pub fn lines(&self) -> &[CartLine] {
        &self.snapshot
    }

    /// Find a line in the snapshot.
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.snapshot.iter().find(|l| &l.id == id)
    }

    /// Start a fetch, returning its sequence number.
    ///
    /// Snapshots are applied in submission order only; a response for a
    /// fetch that was started before an already-applied one is stale and
    /// gets dropped.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_fetch_seq += 1;
        self.next_fetch_seq
    }

    /// Apply a fetched snapshot. Returns false when the fetch is stale.
    pub fn apply_snapshot(&mut self, fetch_seq: u64, lines: Vec<CartLine>) -> bool {
        if fetch_seq <= self.applied_fetch_seq {
            warn!(fetch_seq, applied = self.applied_fetch_seq, "dropping stale cart snapshot");
            return false;
        }
        debug!(fetch_seq, count = lines.len(), "applying cart snapshot");
        self.snapshot = lines;
        self.applied_fetch_seq = fetch_seq;
        true
    }

    /// Refetch the canonical list and replace the snapshot.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let user = self.require_user()?.clone();
        let fetch_seq = self.begin_fetch();
        let entries = self.resource.list(&user).await?;
        let lines = self.enrich(entries).await;
        self.apply_snapshot(fetch_seq, lines);
        Ok(())
    }

    /// Append a new line for a book.
    ///
    /// A second add of a book already in the cart creates a second line;
    /// nothing merges here. That matches the upstream behavior exactly
    /// and callers depend on it, so do not "fix" it in passing.
    pub async fn add_line(&mut self, book_id: BookId, quantity: i64) -> Result<LineId, ClientError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity).into());
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::ValidationError(format!(
                "quantity {} exceeds maximum allowed ({})",
                quantity, MAX_QUANTITY_PER_LINE
            ))
            .into());
        }
        let user = self.require_user()?.clone();

        let entry = CartEntry {
            id: LineId::generate(),
            user_id: user,
            book_id,
            quantity,
        };
        let stored = self.resource.create(&entry).await?;
        let line = self.enrich_one(stored).await;
        let id = line.id.clone();
        self.snapshot.push(line);
        Ok(id)
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// Returns the server-confirmed quantity, or `None` when the call
    /// turned into a removal.
    pub async fn set_quantity(
        &mut self,
        line_id: &LineId,
        quantity: i64,
    ) -> Result<Option<i64>, ClientError> {
        if quantity <= 0 {
            self.remove_line(line_id).await?;
            return Ok(None);
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::ValidationError(format!(
                "quantity {} exceeds maximum allowed ({})",
                quantity, MAX_QUANTITY_PER_LINE
            ))
            .into());
        }
        self.require_user()?;
        if self.line(line_id).is_none() {
            return Err(ClientError::LineNotFound(line_id.to_string()));
        }

        let confirmed = self.resource.patch_quantity(line_id, quantity).await?;
        if let Some(line) = self.snapshot.iter_mut().find(|l| &l.id == line_id) {
            line.quantity = confirmed;
        }
        Ok(Some(confirmed))
    }

    /// Remove a line.
    pub async fn remove_line(&mut self, line_id: &LineId) -> Result<(), ClientError> {
        self.require_user()?;
        if self.line(line_id).is_none() {
            return Err(ClientError::LineNotFound(line_id.to_string()));
        }
        self.resource.delete(line_id).await?;
        self.snapshot.retain(|l| &l.id != line_id);
        Ok(())
    }

    async fn enrich(&self, entries: Vec<CartEntry>) -> Vec<CartLine> {
        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            lines.push(self.enrich_one(entry).await);
        }
        lines
    }

    /// Resolve display data for one entry, degrading to a placeholder
    /// line when the catalog lookup fails.
    async fn enrich_one(&self, entry: CartEntry) -> CartLine {
        match self.catalog.lookup(&entry.book_id).await {
            Ok(info) => CartLine {
                id: entry.id,
                user_id: entry.user_id,
                book_id: entry.book_id,
                quantity: entry.quantity,
                unit_price: info.unit_price,
                title: info.title,
                image: info.image.map(|i| i.normalize()),
            },
            Err(err) => {
                warn!(book = %entry.book_id, %err, "catalog lookup failed, using placeholder");
                CartLine {
                    id: entry.id,
                    user_id: entry.user_id,
                    book_id: entry.book_id,
                    quantity: entry.quantity,
                    unit_price: Money::zero(),
                    title: PLACEHOLDER_TITLE.to_string(),
                    image: None,
                }
            }
        }
    }
}
