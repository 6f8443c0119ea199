//! Cart pricing and order lifecycle domain types for Bookstall.
//!
//! This crate is the pure half of the cart/order subsystem:
//!
//! - **Cart**: cart lines, selections, vouchers, shipping policy, and
//!   the pricing computation over them
//! - **Order**: the order record, its status lifecycle machine, and the
//!   validation gate applied to order payloads
//!
//! Everything here is deterministic and free of I/O. The stateful
//! client-side half (snapshots, optimistic mutations, reconciliation)
//! lives in `bookstall-client`.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstall_commerce::prelude::*;
//!
//! let policy = ShippingPolicy::new(Money::new(45_000), Money::new(15_000));
//! let totals = compute_totals(&lines, &Selection::All, &policy, None)?;
//! println!("to pay: {}", totals.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod order;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Cart
    pub use crate::cart::{
        compute_totals, CartLine, ImageRef, Selection, ShippingPolicy, Totals, Voucher,
        VoucherKind,
    };

    // Order
    pub use crate::order::{
        filter_for_list, normalize_for_detail, transition, validate_core, validate_products,
        validate_shipping, Order, OrderProduct, OrderStatus, OrderWarning, PaymentDetails,
        PaymentStatus, RawOrder, RawOrderProduct, Receiver, ShippingDetails, StatusHistoryEntry,
    };
}
