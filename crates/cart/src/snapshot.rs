//! Encoding of the persisted cart snapshot.
//!
//! The snapshot is a JSON array of line items:
//!
//! ```json
//! [{"name": "Mug", "price": 10.0, "quantity": 3, "image": "/img/mug.png"}]
//! ```
//!
//! Decoding revalidates every entry, so a snapshot edited by hand or written
//! by an older build cannot smuggle an empty name, a `null` price or a zero
//! quantity into the cart.

use std::collections::HashSet;

use storefront_cart_core::{LineItem, checked_total};
use thiserror::Error;

/// Reasons a stored snapshot is rejected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not valid JSON, not an array, or an entry failed validation.
    #[error("malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two entries share a name.
    #[error("cart snapshot lists {0:?} more than once")]
    DuplicateName(String),

    /// The lines add up to more than a `Decimal` can hold.
    #[error("cart snapshot total is out of range")]
    TotalOutOfRange,
}

/// Serialize line items into snapshot form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parse and validate a snapshot.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the snapshot is malformed or breaks the
/// one-line-per-name rule, or if its total does not fit in a `Decimal`.
pub fn decode(raw: &str) -> Result<Vec<LineItem>, SnapshotError> {
    let items: Vec<LineItem> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.name.as_str()) {
            return Err(SnapshotError::DuplicateName(item.name.to_string()));
        }
    }

    if checked_total(&items).is_none() {
        return Err(SnapshotError::TotalOutOfRange);
    }

    Ok(items)
}
