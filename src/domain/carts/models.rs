//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::carts::errors::CartsServiceError;

/// Product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a product identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
    /// Units in the cart; not floored at zero.
    pub quantity: i64,
}

impl CartItem {
    /// Line total (`price × quantity`), or `None` when it does not fit in a
    /// [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// NewCartItem Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        }
    }
}

/// Aggregate figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct lines.
    pub lines: usize,

    /// Sum of line quantities.
    pub quantity: i64,

    /// Sum of line totals.
    pub subtotal: Decimal,
}

impl CartSummary {
    /// Summarise `items`.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::SummaryOverflow`] when the total quantity
    /// or subtotal does not fit its type.
    pub fn of(items: &[CartItem]) -> Result<Self, CartsServiceError> {
        items.iter().try_fold(
            Self {
                lines: items.len(),
                ..Self::default()
            },
            |summary, item| {
                let quantity = summary.quantity.checked_add(item.quantity);
                let subtotal = item
                    .line_total()
                    .and_then(|total| summary.subtotal.checked_add(total));

                match (quantity, subtotal) {
                    (Some(quantity), Some(subtotal)) => Ok(Self {
                        quantity,
                        subtotal,
                        ..summary
                    }),
                    _ => Err(CartsServiceError::SummaryOverflow(item.id.clone())),
                }
            },
        )
    }
}
