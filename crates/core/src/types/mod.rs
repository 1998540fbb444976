//! Core types for the storefront cart.
//!
//! This module provides type-safe wrappers for the values a cart line is made of.

pub mod line_item;
pub mod name;
pub mod price;
pub mod quantity;

pub use line_item::{LineItem, LineItemError, NewLineItem, checked_total};
pub use name::{NameError, ProductName};
pub use price::{Price, PriceError, PriceInput, format_amount};
pub use quantity::{Quantity, QuantityError};
