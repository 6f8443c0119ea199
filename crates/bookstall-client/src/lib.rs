//! Client-side cart consistency layer for Bookstall.
//!
//! This crate keeps a cart's *displayed* state consistent with its
//! *server-confirmed* state while mutations are in flight:
//!
//! - **CartStore**: canonical per-user snapshot, round-tripping every
//!   mutation through an injected cart resource
//! - **MutationTracker**: per-line optimistic state with
//!   last-submission-wins races and rollback on failure
//! - **HandoffStore**: single-use transfer of a cart selection into
//!   checkout
//! - **CartService / OrderService**: the operations pages consume
//!
//! Pure pricing and order-lifecycle rules live in `bookstall-commerce`;
//! this crate owns everything stateful and asynchronous.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstall_client::prelude::*;
//!
//! let (mut cart, mut notices) = CartService::new(
//!     resource,
//!     catalog,
//!     Some(UserId::new("u1")),
//!     ClientConfig::default(),
//! );
//!
//! // Optimistic: the displayed quantity changes before the server
//! // confirms. Failures roll back and arrive on `notices`.
//! cart.submit_quantity(&line_id, 3).await?;
//! let totals = cart.compute_totals(&Selection::All, None)?;
//! ```

pub mod config;
pub mod error;
pub mod handoff;
pub mod optimistic;
pub mod reconcile;
pub mod resource;
pub mod service;
pub mod store;

pub use config::ClientConfig;
pub use error::ClientError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::error::ClientError;
    pub use crate::handoff::{HandoffStore, HandoffToken};
    pub use crate::optimistic::{MutationTracker, PendingKind, PendingMutation, Settlement};
    pub use crate::reconcile::Invalidation;
    pub use crate::resource::{BookInfo, CartEntry, CartResource, CatalogLookup, OrderResource};
    pub use crate::service::{CartNotice, CartService, OrderService};
    pub use crate::store::CartStore;

    pub use bookstall_commerce::prelude::*;
}
