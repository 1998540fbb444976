//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from product records as either JSON numbers or strings, so
//! every price goes through [`Price::parse`] before it can enter a cart. The
//! parsed amount is a [`Decimal`], which keeps line totals such as
//! `3 × 9.99 = 29.97` exact.
//!
//! ```
//! use rust_decimal::Decimal;
//! use storefront_cart_core::{Price, PriceInput};
//!
//! let from_number = Price::parse(PriceInput::from(9.99)).unwrap();
//! let from_text = Price::parse(PriceInput::from("9.99")).unwrap();
//! assert_eq!(from_number, from_text);
//! assert_eq!(from_number.amount(), Decimal::new(999, 2));
//!
//! assert!(Price::parse(PriceInput::from("not-a-number")).is_err());
//! ```

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::quantity::Quantity;

/// Errors that can occur when normalizing a [`PriceInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The string input is empty or only whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The string input is not a decimal number.
    #[error("price is not a number: {0:?}")]
    NotANumber(String),
    /// The numeric input is NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount cannot be represented as a decimal.
    #[error("price is out of range")]
    OutOfRange,
}

/// Raw price input as supplied by callers.
///
/// Product records carry prices either as numbers or as strings, and both
/// shapes deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// A numeric price, e.g. `9.99`.
    Number(f64),
    /// A textual price, e.g. `"9.99"`.
    Text(String),
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PriceInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A finite, non-negative price in the store's base currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        // Collapse "-0" so it never displays with a sign.
        if amount.is_zero() {
            return Ok(Self(Decimal::ZERO));
        }
        Ok(Self(amount))
    }

    /// A price of zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Normalize raw input into a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is an empty string, or a string that is not a decimal number
    ///   (trailing text and currency symbols are not stripped)
    /// - Is NaN or infinite
    /// - Is negative
    /// - Does not fit in a [`Decimal`]
    pub fn parse(input: PriceInput) -> Result<Self, PriceError> {
        match input {
            PriceInput::Number(n) => Self::from_f64(n),
            PriceInput::Text(s) => Self::from_text(&s),
        }
    }

    fn from_f64(n: f64) -> Result<Self, PriceError> {
        if !n.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if n < 0.0 {
            return Err(PriceError::Negative);
        }
        // The shortest round-trip representation keeps 9.99 as 9.99 rather
        // than its binary expansion.
        let amount = Decimal::from_str(&n.to_string()).map_err(|_| PriceError::OutOfRange)?;
        Self::from_parsed(amount, n != 0.0, false)
    }

    fn from_text(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        };

        match parsed {
            Ok(amount) => Self::from_parsed(
                amount,
                has_nonzero_digit(trimmed),
                trimmed.starts_with('-'),
            ),
            // Well-formed numbers that `Decimal` cannot hold are a range
            // problem, not a syntax problem.
            Err(_) => match trimmed.parse::<f64>() {
                Ok(_) if !trimmed.bytes().any(|b| b.is_ascii_digit()) => {
                    Err(PriceError::NotANumber(trimmed.to_owned()))
                }
                Ok(n) if n < 0.0 => Err(PriceError::Negative),
                Ok(_) => Err(PriceError::OutOfRange),
                Err(_) => Err(PriceError::NotANumber(trimmed.to_owned())),
            },
        }
    }

    /// A non-zero input that rounded to zero is out of range, not free.
    fn from_parsed(amount: Decimal, nonzero: bool, negative: bool) -> Result<Self, PriceError> {
        if nonzero && negative {
            return Err(PriceError::Negative);
        }
        if nonzero && amount.is_zero() {
            return Err(PriceError::OutOfRange);
        }
        Self::new(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this price, or `None` if the product
    /// does not fit in a [`Decimal`].
    #[must_use]
    pub fn times(&self, quantity: Quantity) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity.get()))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.0)
    }
}

/// Format a decimal amount as a dollar string with two decimal places.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Whether the mantissa of a decimal literal has a non-zero digit.
fn has_nonzero_digit(literal: &str) -> bool {
    literal
        .split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = PriceInput::deserialize(deserializer)?;
        Self::parse(input).map_err(serde::de::Error::custom)
    }
}
