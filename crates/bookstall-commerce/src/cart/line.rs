//! Cart line types.

use crate::error::CommerceError;
use crate::ids::{BookId, LineId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Title shown when a catalog lookup for a line's book fails.
pub const PLACEHOLDER_TITLE: &str = "Unknown title";

/// An image reference as it arrives off the wire.
///
/// Upstream responses carry either a bare URL string or a structured
/// object. The union is decoded once at the boundary and immediately
/// normalized with [`ImageRef::url`]; business logic never branches on
/// the shape again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// A bare URL string.
    Url(String),
    /// A structured image object.
    Object {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl ImageRef {
    /// The normalized URL, regardless of wire shape.
    pub fn url(&self) -> &str {
        match self {
            ImageRef::Url(url) => url,
            ImageRef::Object { url, .. } => url,
        }
    }

    /// Normalize to the plain-URL form.
    pub fn normalize(self) -> ImageRef {
        match self {
            ImageRef::Url(url) => ImageRef::Url(url),
            ImageRef::Object { url, .. } => ImageRef::Url(url),
        }
    }
}

/// One quantity-bearing entry in a user's cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Unique line identifier.
    pub id: LineId,
    /// Owning user. Lines are never shared across users.
    pub user_id: UserId,
    /// Catalog item referenced by this line.
    pub book_id: BookId,
    /// Quantity, always >= 1. A line reduced to 0 is removed, not kept.
    pub quantity: i64,
    /// Unit price in minor currency units.
    pub unit_price: Money,
    /// Book title (denormalized for display).
    pub title: String,
    /// Cover image reference.
    pub image: Option<ImageRef>,
}

impl CartLine {
    /// Create a new cart line.
    ///
    /// Returns an error if the quantity is not positive or exceeds the
    /// per-line limit.
    pub fn new(
        user_id: UserId,
        book_id: BookId,
        quantity: i64,
        unit_price: Money,
        title: impl Into<String>,
    ) -> Result<Self, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::ValidationError(format!(
                "quantity {} exceeds maximum allowed ({})",
                quantity, MAX_QUANTITY_PER_LINE
            )));
        }
        Ok(Self {
            id: LineId::generate(),
            user_id,
            book_id,
            quantity,
            unit_price,
            title: title.into(),
            image: None,
        })
    }

    /// Line subtotal (unit price times quantity).
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Whether a catalog lookup failed for this line and it carries
    /// placeholder display data.
    pub fn is_placeholder(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64) -> Result<CartLine, CommerceError> {
        CartLine::new(
            UserId::new("u1"),
            BookId::new("b1"),
            quantity,
            Money::new(20_000),
            "A Book",
        )
    }

    #[test]
    fn test_line_rejects_non_positive_quantity() {
        assert!(matches!(line(0), Err(CommerceError::InvalidQuantity(0))));
        assert!(matches!(line(-3), Err(CommerceError::InvalidQuantity(-3))));
    }

    #[test]
    fn test_line_subtotal() {
        let l = line(2).unwrap();
        assert_eq!(l.subtotal().unwrap(), Money::new(40_000));
    }

    #[test]
    fn test_image_ref_decodes_both_shapes() {
        let bare: ImageRef = serde_json::from_str("\"https://img/x.jpg\"").unwrap();
        assert_eq!(bare.url(), "https://img/x.jpg");

        let structured: ImageRef =
            serde_json::from_str(r#"{"url":"https://img/y.jpg","alt":"cover"}"#).unwrap();
        assert_eq!(structured.url(), "https://img/y.jpg");
    }

    #[test]
    fn test_image_ref_normalize() {
        let structured = ImageRef::Object {
            url: "https://img/z.jpg".to_string(),
            alt: None,
        };
        assert_eq!(
            structured.normalize(),
            ImageRef::Url("https://img/z.jpg".to_string())
        );
    }
}
