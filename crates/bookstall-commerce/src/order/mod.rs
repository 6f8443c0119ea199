//! Order module.
//!
//! Contains the order record, its status lifecycle, and the validation
//! gate applied to order payloads at the boundary.

mod lifecycle;
mod order;
mod validate;

pub use lifecycle::{transition, OrderStatus, StatusHistoryEntry};
pub use order::{
    Order, OrderProduct, PaymentDetails, PaymentStatus, Receiver, ShippingDetails,
};
pub use validate::{
    filter_for_list, normalize_for_detail, validate_core, validate_products, validate_shipping,
    OrderWarning, RawOrder, RawOrderProduct,
};
