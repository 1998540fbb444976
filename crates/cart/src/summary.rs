//! Checkout summary view.
//!
//! Preformatted strings for rendering an order summary: one row per line
//! with unit price and line total, plus the item count and grand total.

use rust_decimal::Decimal;
use storefront_cart_core::{LineItem, checked_total, format_amount};

use crate::storage::SlotStorage;
use crate::store::CartStore;

/// One row of the checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Checkout summary for a whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<SummaryLine>,
    pub item_count: u64,
    pub total: String,
}

impl CartSummary {
    /// Summary of an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            item_count: 0,
            total: "$0.00".to_string(),
        }
    }

    /// Build a summary from line items.
    #[must_use]
    pub fn from_items(items: &[LineItem]) -> Self {
        if items.is_empty() {
            return Self::empty();
        }

        Self {
            lines: items.iter().map(SummaryLine::from).collect(),
            item_count: items.iter().map(|line| u64::from(line.quantity.get())).sum(),
            total: format_amount(checked_total(items).unwrap_or(Decimal::MAX)),
        }
    }

    /// Whether the summary has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&LineItem> for SummaryLine {
    fn from(line: &LineItem) -> Self {
        Self {
            name: line.name.to_string(),
            quantity: line.quantity.get(),
            unit_price: line.price.display(),
            line_total: format_amount(line.subtotal()),
        }
    }
}

impl<S: SlotStorage> From<&CartStore<S>> for CartSummary {
    fn from(store: &CartStore<S>) -> Self {
        Self::from_items(store.items())
    }
}
