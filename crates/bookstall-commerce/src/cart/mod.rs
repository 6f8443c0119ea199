//! Shopping cart module.
//!
//! Contains types for cart lines, selections, pricing, and vouchers.

mod line;
mod pricing;
mod voucher;

pub use line::{CartLine, ImageRef, MAX_QUANTITY_PER_LINE, PLACEHOLDER_TITLE};
pub use pricing::{compute_totals, Selection, ShippingPolicy, Totals};
pub use voucher::{Voucher, VoucherKind};
