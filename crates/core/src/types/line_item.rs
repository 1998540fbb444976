//! Cart line items.
//!
//! [`NewLineItem`] is what callers build from a product record; it is
//! unvalidated. [`LineItem`] is what a cart stores; every field has already
//! passed its own parse step, so a `LineItem` cannot hold an empty name, a
//! NaN price, or a zero quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::name::{NameError, ProductName};
use super::price::{Price, PriceError, PriceInput};
use super::quantity::{Quantity, QuantityError};

/// Reasons a [`NewLineItem`] cannot become a [`LineItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    #[error("invalid name: {0}")]
    Name(#[from] NameError),
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
    #[error("invalid quantity: {0}")]
    Quantity(#[from] QuantityError),
}

/// Unvalidated input for adding a product to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub name: String,
    pub price: PriceInput,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewLineItem {
    /// Create input for `quantity` units of a product.
    #[must_use]
    pub fn new(name: impl Into<String>, price: impl Into<PriceInput>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            quantity,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Validate every field and build a [`LineItem`].
    ///
    /// Fields are checked in order: name, price, quantity. The first failure
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] naming the field that failed.
    pub fn validate(self) -> Result<LineItem, LineItemError> {
        let name = ProductName::parse(&self.name)?;
        let price = Price::parse(self.price)?;
        let quantity = Quantity::new(self.quantity)?;

        Ok(LineItem {
            name,
            price,
            quantity,
            image: self.image,
        })
    }
}

/// One product and its requested quantity.
///
/// Serialized form: `{"name": "Mug", "price": 10.0, "quantity": 3, "image": "..."}`
/// with `image` omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: ProductName,
    pub price: Price,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// `price * quantity` for this line.
    ///
    /// Saturates at [`Decimal::MAX`]. Carts reject any line whose
    /// [`checked_subtotal`](Self::checked_subtotal) is `None`, so a stored
    /// line never reaches that bound.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.checked_subtotal().unwrap_or(Decimal::MAX)
    }

    /// `price * quantity`, or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.price.times(self.quantity)
    }
}

/// Sum of line subtotals, or `None` if any subtotal or the sum itself does
/// not fit in a [`Decimal`].
#[must_use]
pub fn checked_total<'a, I>(items: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().try_fold(Decimal::ZERO, |total, line| {
        total.checked_add(line.checked_subtotal()?)
    })
}
