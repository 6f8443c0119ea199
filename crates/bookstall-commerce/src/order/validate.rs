//! Order validation gate.
//!
//! Order payloads arrive from the order resource with no shape
//! guarantees, so they are decoded into [`RawOrder`] and validated here,
//! once, at the boundary. Core failures are fatal and block the order
//! entirely; product and shipping problems surface as non-fatal
//! warnings.
//!
//! Context asymmetry, preserved on purpose: a products-invalid order is
//! silently dropped from list views but still rendered in a detail view
//! with a warning attached.

use crate::cart::ImageRef;
use crate::error::CommerceError;
use crate::ids::{BookId, OrderId, UserId};
use crate::money::Money;
use crate::order::lifecycle::{OrderStatus, StatusHistoryEntry};
use crate::order::order::{Order, OrderProduct, PaymentDetails, Receiver, ShippingDetails};
use serde::{Deserialize, Serialize};

/// An order as decoded off the wire, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub receiver: Option<Receiver>,
    #[serde(default)]
    pub products: Vec<RawOrderProduct>,
    #[serde(default)]
    pub shipping: Option<ShippingDetails>,
    #[serde(default)]
    pub payment: Option<PaymentDetails>,
    #[serde(default)]
    pub sub_total: Option<i64>,
    #[serde(default)]
    pub shipping_cost: Option<i64>,
    #[serde(default)]
    pub total_discount: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
}

/// An order product as decoded off the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawOrderProduct {
    #[serde(default)]
    pub id: Option<BookId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl RawOrderProduct {
    fn is_valid(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            && self.price.is_some()
            && self.quantity.is_some()
    }
}

/// A non-fatal order warning, rendered inline without blocking the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OrderWarning {
    /// Product list is empty or contains malformed items.
    InvalidProducts { reason: String },
    /// Receiver fields are missing.
    IncompleteShippingInfo { missing: Vec<String> },
}

/// Validate the fields without which an order cannot be displayed or
/// operated on at all: `id`, a non-negative `total`, and `createdAt`.
pub fn validate_core(raw: &RawOrder) -> Result<(), CommerceError> {
    let mut missing = Vec::new();
    if raw.id.is_none() {
        missing.push("id".to_string());
    }
    match raw.total {
        Some(t) if t >= 0 => {}
        _ => missing.push("total".to_string()),
    }
    if raw.created_at.is_none() {
        missing.push("createdAt".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CommerceError::MissingRequiredData { missing })
    }
}

/// Validate the product list. Empty, or any item lacking a name, price,
/// or quantity, makes the whole list invalid.
pub fn validate_products(products: &[RawOrderProduct]) -> Result<(), OrderWarning> {
    if products.is_empty() {
        return Err(OrderWarning::InvalidProducts {
            reason: "order has no products".to_string(),
        });
    }
    for (idx, product) in products.iter().enumerate() {
        if !product.is_valid() {
            return Err(OrderWarning::InvalidProducts {
                reason: format!("product at index {idx} is missing name, price, or quantity"),
            });
        }
    }
    Ok(())
}

/// Validate receiver details. Missing fields produce warnings, never
/// block.
pub fn validate_shipping(raw: &RawOrder) -> Option<OrderWarning> {
    let mut missing = Vec::new();
    let receiver = raw.receiver.clone().unwrap_or_default();
    if receiver.name.is_empty() {
        missing.push("receiver.name".to_string());
    }
    if receiver.address.is_empty() {
        missing.push("receiver.address".to_string());
    }
    if receiver.phone.is_empty() {
        missing.push("receiver.phone".to_string());
    }

    if missing.is_empty() {
        None
    } else {
        Some(OrderWarning::IncompleteShippingInfo { missing })
    }
}

/// Normalize a raw order for a detail view.
///
/// Fails only on core validation. Product and shipping problems are
/// returned as warnings alongside the normalized order, which is still
/// rendered.
pub fn normalize_for_detail(raw: RawOrder) -> Result<(Order, Vec<OrderWarning>), CommerceError> {
    validate_core(&raw)?;

    let mut warnings = Vec::new();
    if let Err(w) = validate_products(&raw.products) {
        warnings.push(w);
    }
    if let Some(w) = validate_shipping(&raw) {
        warnings.push(w);
    }

    Ok((normalize(raw), warnings))
}

/// Filter a raw order collection for a list view.
///
/// Orders failing core or product validation are silently dropped.
pub fn filter_for_list(raws: Vec<RawOrder>) -> Vec<Order> {
    raws.into_iter()
        .filter(|raw| validate_core(raw).is_ok() && validate_products(&raw.products).is_ok())
        .map(normalize)
        .collect()
}

/// Build a typed order from a core-valid raw order, defaulting absent
/// optional data. Ad hoc defaults live here and nowhere else.
fn normalize(raw: RawOrder) -> Order {
    Order {
        id: raw.id.unwrap_or_else(|| OrderId::new("")),
        user_id: raw.user_id.unwrap_or_else(|| UserId::new("")),
        status: raw.status.unwrap_or_default(),
        receiver: raw.receiver.unwrap_or_default(),
        products: raw
            .products
            .into_iter()
            .map(|p| OrderProduct {
                id: p.id.unwrap_or_else(|| BookId::new("")),
                name: p.name.unwrap_or_default(),
                price: Money::new(p.price.unwrap_or(0)),
                quantity: p.quantity.unwrap_or(0),
                image: p.image.map(ImageRef::normalize),
            })
            .collect(),
        shipping: raw.shipping.unwrap_or_default(),
        payment: raw.payment.unwrap_or_default(),
        sub_total: Money::new(raw.sub_total.unwrap_or(0)),
        shipping_cost: Money::new(raw.shipping_cost.unwrap_or(0)),
        total_discount: Money::new(raw.total_discount.unwrap_or(0)),
        total: Money::new(raw.total.unwrap_or(0)),
        created_at: raw.created_at.unwrap_or(0),
        status_history: raw.status_history,
        confirmed_at: None,
        preparing_at: None,
        shipped_at: None,
        delivered_at: None,
        cancelled_at: None,
        returned_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product() -> RawOrderProduct {
        RawOrderProduct {
            id: Some(BookId::new("b1")),
            name: Some("A Book".to_string()),
            price: Some(20_000),
            quantity: Some(2),
            image: None,
        }
    }

    fn valid_raw() -> RawOrder {
        RawOrder {
            id: Some(OrderId::new("ord-1")),
            user_id: Some(UserId::new("u1")),
            status: Some(OrderStatus::Pending),
            receiver: Some(Receiver {
                name: "An Nguyen".to_string(),
                address: "12 Tran Hung Dao".to_string(),
                phone: "0900000000".to_string(),
            }),
            products: vec![valid_product()],
            total: Some(55_000),
            created_at: Some(1_700_000_000),
            ..RawOrder::default()
        }
    }

    #[test]
    fn test_validate_core_ok() {
        assert!(validate_core(&valid_raw()).is_ok());
    }

    #[test]
    fn test_validate_core_names_missing_total() {
        let mut raw = valid_raw();
        raw.total = None;
        let err = validate_core(&raw).unwrap_err();
        match err {
            CommerceError::MissingRequiredData { missing } => {
                assert!(missing.contains(&"total".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_core_rejects_negative_total() {
        let mut raw = valid_raw();
        raw.total = Some(-1);
        assert!(validate_core(&raw).is_err());
    }

    #[test]
    fn test_validate_products_empty_is_invalid() {
        assert!(validate_products(&[]).is_err());
    }

    #[test]
    fn test_validate_products_missing_name() {
        let mut p = valid_product();
        p.name = None;
        assert!(validate_products(&[p]).is_err());
    }

    #[test]
    fn test_validate_shipping_warns_but_never_blocks() {
        let mut raw = valid_raw();
        raw.receiver = Some(Receiver {
            name: "An Nguyen".to_string(),
            address: String::new(),
            phone: String::new(),
        });
        let warning = validate_shipping(&raw).unwrap();
        match warning {
            OrderWarning::IncompleteShippingInfo { missing } => {
                assert_eq!(missing, vec!["receiver.address", "receiver.phone"]);
            }
            other => panic!("unexpected warning: {other:?}"),
        }
        // Still renders in detail context
        assert!(normalize_for_detail(raw).is_ok());
    }

    #[test]
    fn test_detail_renders_invalid_products_with_warning() {
        let mut raw = valid_raw();
        raw.products = Vec::new();
        let (order, warnings) = normalize_for_detail(raw).unwrap();
        assert!(order.products.is_empty());
        assert!(warnings
            .iter()
            .any(|w| matches!(w, OrderWarning::InvalidProducts { .. })));
    }

    #[test]
    fn test_list_filters_invalid_products_silently() {
        let mut invalid = valid_raw();
        invalid.products = Vec::new();
        let orders = filter_for_list(vec![valid_raw(), invalid]);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, OrderId::new("ord-1"));
    }

    #[test]
    fn test_list_filters_core_invalid() {
        let mut missing_total = valid_raw();
        missing_total.total = None;
        let orders = filter_for_list(vec![missing_total]);
        assert!(orders.is_empty());
    }
}
