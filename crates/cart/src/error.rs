//! Error types for cart operations.
//!
//! Only failures the caller has to act on surface here. Storage failures are
//! recovered inside the store and only logged.

use storefront_cart_core::LineItemError;
use thiserror::Error;

/// Error returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The input failed validation. The cart is unchanged.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] LineItemError),

    /// A mutation was attempted before `initialize()` completed.
    ///
    /// This is an integration bug in the consumer, not a data problem.
    #[error("Cart used before initialize()")]
    NotInitialized,

    /// The line subtotal or cart total would not fit in a `Decimal`. The
    /// cart is unchanged.
    #[error("Cart total is out of range")]
    TotalOutOfRange,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
