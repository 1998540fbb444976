//! The session cart store.
//!
//! A [`CartStore`] starts [`Lifecycle::Uninitialized`]. [`CartStore::initialize`]
//! hydrates it from durable storage once and moves it to [`Lifecycle::Ready`];
//! mutations before that are rejected with [`CartError::NotInitialized`].
//!
//! Every mutation validates first, then changes the in-memory cart, then
//! persists. A mutation that would push the cart total past what a
//! [`Decimal`] can hold is rejected before anything changes. Persistence failures switch the store to
//! [`Persistence::MemoryOnly`] for the rest of the session and are never
//! reported to the caller.

use rust_decimal::Decimal;
use storefront_cart_core::{LineItem, LineItemError, NewLineItem, Price, Quantity, checked_total};
use tracing::instrument;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::snapshot;
use crate::storage::SlotStorage;

/// Store lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, `initialize()` not yet called.
    Uninitialized,
    /// Hydrated and accepting mutations.
    Ready,
}

/// Whether mutations are still written to durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Every mutation is written to the storage slot.
    Durable,
    /// Storage is disabled or failed; the cart lives in memory only.
    MemoryOnly,
}

/// Result of [`CartStore::add_to_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added,
    /// An existing line with the same name absorbed the quantity.
    Merged {
        /// The line's quantity after the merge.
        quantity: Quantity,
    },
}

/// Result of [`CartStore::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The line now has the requested quantity.
    Updated,
    /// The requested quantity was 0, so the line was removed.
    Removed,
    /// No line has that name. Nothing changed.
    Missing,
}

/// Authoritative in-memory cart for one session, mirrored to a storage slot.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    items: Vec<LineItem>,
    lifecycle: Lifecycle,
    persistence: Persistence,
}

impl<S: SlotStorage> CartStore<S> {
    /// Create an uninitialized store that persists under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            items: Vec::new(),
            lifecycle: Lifecycle::Uninitialized,
            persistence: Persistence::Durable,
        }
    }

    /// Create an uninitialized store from configuration.
    ///
    /// With `persist = false` the store never touches `storage`.
    pub fn from_config(storage: S, config: &CartConfig) -> Self {
        let mut store = Self::new(storage, config.storage_key.clone());
        if !config.persist {
            store.persistence = Persistence::MemoryOnly;
        }
        store
    }

    /// Hydrate the cart from durable storage.
    ///
    /// Missing, malformed or unreadable snapshots all yield an empty cart.
    /// An unreadable backend also switches the store to memory-only mode.
    /// Calling this again once ready does nothing.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn initialize(&mut self) {
        if self.lifecycle == Lifecycle::Ready {
            tracing::debug!("Cart already initialized");
            return;
        }

        self.items = match self.persistence {
            Persistence::MemoryOnly => Vec::new(),
            Persistence::Durable => self.load(),
        };
        self.lifecycle = Lifecycle::Ready;

        tracing::debug!(
            lines = self.items.len(),
            durable = self.is_durable(),
            "Cart initialized"
        );
    }

    fn load(&mut self) -> Vec<LineItem> {
        match self.storage.read(&self.key) {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => snapshot::decode(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding stored cart");
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart from storage");
                self.persistence = Persistence::MemoryOnly;
                Vec::new()
            }
        }
    }

    /// Add `input.quantity` units of a product.
    ///
    /// If a line with the same name exists its quantity grows and its
    /// original price is kept, even if `input` carries a different price.
    /// Otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInitialized`] before `initialize()`
    /// - [`CartError::InvalidItem`] if the name, price or quantity is
    ///   invalid, or the merged quantity would overflow
    /// - [`CartError::TotalOutOfRange`] if the line subtotal or cart total
    ///   would not fit in a [`Decimal`]
    ///
    /// The cart is unchanged on error.
    #[instrument(skip(self, input), fields(name = %input.name, quantity = input.quantity))]
    pub fn add_to_cart(&mut self, input: NewLineItem) -> Result<AddOutcome> {
        self.ensure_ready("add_to_cart")?;

        let item = input.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected cart item");
        })?;

        let others = total_excluding(&self.items, item.name.as_str())?;

        let outcome = match self.items.iter_mut().find(|line| line.name == item.name) {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .map_err(LineItemError::from)?;
                ensure_total_fits(others, existing.price, quantity)?;

                if existing.price != item.price {
                    tracing::debug!(
                        kept = %existing.price,
                        ignored = %item.price,
                        "Keeping original price for repeated add"
                    );
                }

                existing.quantity = quantity;
                AddOutcome::Merged { quantity }
            }
            None => {
                ensure_total_fits(others, item.price, item.quantity)?;
                self.items.push(item);
                AddOutcome::Added
            }
        };

        self.persist();
        Ok(outcome)
    }

    /// Remove the line named `name`. Surrounding whitespace in `name` is
    /// ignored, as it is when adding.
    ///
    /// Returns `true` if a line was removed, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInitialized`] before `initialize()`.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, name: &str) -> Result<bool> {
        self.ensure_ready("remove_from_cart")?;
        let name = lookup_name(name);

        let before = self.items.len();
        self.items.retain(|line| line.name != *name);
        let removed = self.items.len() != before;

        if removed {
            self.persist();
        }
        Ok(removed)
    }

    /// Set the quantity of the line named `name`. A quantity of 0 removes it.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInitialized`] before `initialize()`
    /// - [`CartError::TotalOutOfRange`] if the new quantity would push the
    ///   line subtotal or cart total out of range; the cart is unchanged
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, name: &str, quantity: u32) -> Result<UpdateOutcome> {
        self.ensure_ready("update_quantity")?;
        let name = lookup_name(name);

        let outcome = match Quantity::new(quantity) {
            Ok(quantity) => {
                let others = total_excluding(&self.items, name)?;
                let Some(line) = self.items.iter_mut().find(|line| line.name == *name) else {
                    return Ok(UpdateOutcome::Missing);
                };
                ensure_total_fits(others, line.price, quantity)?;
                line.quantity = quantity;
                UpdateOutcome::Updated
            }
            Err(_) => {
                let Some(index) = self.items.iter().position(|line| line.name == *name) else {
                    return Ok(UpdateOutcome::Missing);
                };
                self.items.remove(index);
                UpdateOutcome::Removed
            }
        };

        self.persist();
        Ok(outcome)
    }

    /// Empty the cart and delete the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInitialized`] before `initialize()`.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> Result<()> {
        self.ensure_ready("clear_cart")?;

        self.items.clear();

        if self.persistence == Persistence::Durable {
            if let Err(e) = self.storage.remove(&self.key) {
                self.degrade(&e);
            }
        }
        Ok(())
    }

    /// Sum of `price * quantity` over all lines, recomputed on every call.
    ///
    /// Mutations keep this sum representable, so the [`Decimal::MAX`]
    /// fallback is never observed.
    #[must_use]
    pub fn total(&self) -> Decimal {
        checked_total(&self.items).unwrap_or(Decimal::MAX)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line named `name`, if any. Surrounding whitespace is ignored.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        let name = lookup_name(name);
        self.items.iter().find(|line| line.name == *name)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Current persistence mode.
    #[must_use]
    pub const fn persistence(&self) -> Persistence {
        self.persistence
    }

    /// Whether mutations are still being written to storage.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.persistence == Persistence::Durable
    }

    /// Slot key the cart persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and hand back its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn ensure_ready(&self, operation: &'static str) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Uninitialized => {
                tracing::error!(operation, "Cart mutated before initialize()");
                Err(CartError::NotInitialized)
            }
        }
    }

    fn persist(&mut self) {
        if self.persistence == Persistence::MemoryOnly {
            return;
        }

        let raw = match snapshot::encode(&self.items) {
            Ok(raw) => raw,
            Err(e) => {
                self.degrade(&e);
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.key, &raw) {
            self.degrade(&e);
        }
    }

    fn degrade(&mut self, error: &dyn std::error::Error) {
        tracing::warn!(
            key = %self.key,
            error = %error,
            "Failed to save cart, continuing in memory only"
        );
        self.persistence = Persistence::MemoryOnly;
    }
}

/// Names are stored trimmed, so lookups trim too.
fn lookup_name(name: &str) -> &str {
    name.trim()
}

/// Sum of every line except `name`.
fn total_excluding(items: &[LineItem], name: &str) -> Result<Decimal> {
    checked_total(items.iter().filter(|line| line.name.as_str() != name))
        .ok_or(CartError::TotalOutOfRange)
}

/// Check that `others` plus `quantity` units at `price` is representable.
fn ensure_total_fits(others: Decimal, price: Price, quantity: Quantity) -> Result<()> {
    price
        .times(quantity)
        .and_then(|line_total| others.checked_add(line_total))
        .map(|_| ())
        .ok_or_else(|| {
            tracing::debug!(%price, quantity = quantity.get(), "Rejected line, total out of range");
            CartError::TotalOutOfRange
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use storefront_cart_core::{PriceError, QuantityError};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn ready_store() -> CartStore<MemoryStorage> {
        let mut store = CartStore::new(MemoryStorage::new(), "cart");
        store.initialize();
        store
    }

    /// Storage that counts writes and can be told to fail.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: bool,
        fail_writes: bool,
        writes: Rc<Cell<usize>>,
    }

    impl SlotStorage for FlakyStorage {
        fn read(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable("storage disabled".to_string()));
            }
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_new_store_is_uninitialized() {
        let store = CartStore::new(MemoryStorage::new(), "cart");
        assert_eq!(store.lifecycle(), Lifecycle::Uninitialized);
        assert!(store.is_empty());
    }

    #[test]
    fn test_mutations_before_initialize_are_rejected() {
        let mut store = CartStore::new(MemoryStorage::new(), "cart");

        assert!(matches!(
            store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)),
            Err(CartError::NotInitialized)
        ));
        assert!(matches!(
            store.remove_from_cart("Mug"),
            Err(CartError::NotInitialized)
        ));
        assert!(matches!(
            store.update_quantity("Mug", 2),
            Err(CartError::NotInitialized)
        ));
        assert!(matches!(store.clear_cart(), Err(CartError::NotInitialized)));

        assert!(store.is_empty());
        assert_eq!(store.storage().get("cart"), None);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut store = ready_store();

        assert_eq!(
            store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap(),
            AddOutcome::Added
        );
        store.add_to_cart(NewLineItem::new("Pen", "2.50", 4)).unwrap();
        store.add_to_cart(NewLineItem::new("Cap", 15.0, 1)).unwrap();

        let names: Vec<&str> = store.items().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Mug", "Pen", "Cap"]);
    }

    #[test]
    fn test_add_merges_by_name() {
        let mut store = ready_store();

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        let outcome = store.add_to_cart(NewLineItem::new("Mug", 10.0, 2)).unwrap();

        assert_eq!(
            outcome,
            AddOutcome::Merged {
                quantity: Quantity::new(3).unwrap()
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Mug").unwrap().quantity.get(), 3);
        assert_eq!(store.total(), Decimal::new(30, 0));
    }

    #[test]
    fn test_merge_keeps_original_price() {
        let mut store = ready_store();

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        store.add_to_cart(NewLineItem::new("Mug", 12.0, 1)).unwrap();

        let mug = store.get("Mug").unwrap();
        assert_eq!(mug.price.amount(), Decimal::new(10, 0));
        assert_eq!(mug.quantity.get(), 2);
    }

    #[test]
    fn test_merge_keeps_original_image() {
        let mut store = ready_store();

        store
            .add_to_cart(NewLineItem::new("Mug", 10.0, 1).with_image("a.png"))
            .unwrap();
        store
            .add_to_cart(NewLineItem::new("Mug", 10.0, 1).with_image("b.png"))
            .unwrap();

        assert_eq!(store.get("Mug").unwrap().image.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_add_trims_name_before_merging() {
        let mut store = ready_store();

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        store.add_to_cart(NewLineItem::new(" Mug ", 10.0, 1)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        let err = store
            .add_to_cart(NewLineItem::new("Widget", "not-a-number", 1))
            .unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidItem(LineItemError::Price(PriceError::NotANumber(_)))
        ));

        assert!(store.add_to_cart(NewLineItem::new("", 1.0, 1)).is_err());
        assert!(store.add_to_cart(NewLineItem::new("Mug", 1.0, 0)).is_err());
        assert!(store.add_to_cart(NewLineItem::new("Mug", -1.0, 1)).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Mug").unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_merge_overflow_leaves_cart_unchanged() {
        let mut store = ready_store();
        store
            .add_to_cart(NewLineItem::new("Mug", 1.0, u32::MAX))
            .unwrap();

        let err = store.add_to_cart(NewLineItem::new("Mug", 1.0, 1)).unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidItem(LineItemError::Quantity(QuantityError::Overflow { .. }))
        ));
        assert_eq!(store.get("Mug").unwrap().quantity.get(), u32::MAX);
    }

    #[test]
    fn test_add_rejects_unrepresentable_subtotal() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        let err = store
            .add_to_cart(NewLineItem::new("Yacht", "1e28", 10))
            .unwrap_err();

        assert!(matches!(err, CartError::TotalOutOfRange));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total(), Decimal::new(10, 0));
        assert_eq!(
            store.storage().get("cart"),
            Some(r#"[{"name":"Mug","price":10.0,"quantity":1}]"#)
        );
    }

    #[test]
    fn test_add_rejects_unrepresentable_total() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Yacht", "7e28", 1)).unwrap();

        assert!(matches!(
            store.add_to_cart(NewLineItem::new("Dinghy", "1e28", 1)),
            Err(CartError::TotalOutOfRange)
        ));
        assert!(matches!(
            store.add_to_cart(NewLineItem::new("Yacht", "7e28", 1)),
            Err(CartError::TotalOutOfRange)
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Yacht").unwrap().quantity.get(), 1);
        assert_eq!(store.total(), Decimal::from_scientific("7e28").unwrap());
    }

    #[test]
    fn test_large_quantities_total_exactly() {
        let mut store = ready_store();
        store
            .add_to_cart(NewLineItem::new("Rivet", "0.01", u32::MAX))
            .unwrap();
        store
            .add_to_cart(NewLineItem::new("Yacht", "1e24", 1))
            .unwrap();

        let expected = Decimal::new(i64::from(u32::MAX), 2)
            + Decimal::from_scientific("1e24").unwrap();
        assert_eq!(store.total(), expected);
        assert_eq!(store.item_count(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_update_quantity_rejects_unrepresentable_total() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Yacht", "4e28", 1)).unwrap();

        assert!(matches!(
            store.update_quantity("Yacht", 2),
            Err(CartError::TotalOutOfRange)
        ));
        assert_eq!(store.get("Yacht").unwrap().quantity.get(), 1);
        assert_eq!(store.total(), Decimal::from_scientific("4e28").unwrap());

        assert_eq!(
            store.update_quantity("Yacht", 0).unwrap(),
            UpdateOutcome::Removed
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookups_trim_like_add() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new(" Mug ", 10.0, 1)).unwrap();

        assert_eq!(store.get(" Mug ").unwrap().name.as_str(), "Mug");
        assert_eq!(
            store.update_quantity(" Mug ", 4).unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(store.get("Mug").unwrap().quantity.get(), 4);

        assert!(store.remove_from_cart(" Mug ").unwrap());
        assert!(store.is_empty());
        assert_eq!(store.storage().get("cart"), Some("[]"));
    }

    #[test]
    fn test_lookups_are_case_sensitive() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        assert!(store.get("mug").is_none());
        assert!(!store.remove_from_cart("MUG").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        store.add_to_cart(NewLineItem::new("Pen", 1.0, 1)).unwrap();

        assert!(store.remove_from_cart("Mug").unwrap());
        let after_first: Vec<LineItem> = store.items().to_vec();

        assert!(!store.remove_from_cart("Mug").unwrap());
        assert_eq!(store.items(), after_first.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        assert_eq!(
            store.update_quantity("Mug", 5).unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(store.get("Mug").unwrap().quantity.get(), 5);
        assert_eq!(store.total(), Decimal::new(50, 0));
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 3)).unwrap();

        assert_eq!(
            store.update_quantity("Mug", 0).unwrap(),
            UpdateOutcome::Removed
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_quantity_missing() {
        let mut store = ready_store();
        assert_eq!(
            store.update_quantity("Ghost", 2).unwrap(),
            UpdateOutcome::Missing
        );
        assert!(store.is_empty());
        assert_eq!(store.storage().get("cart"), None);
    }

    #[test]
    fn test_clear_cart_removes_snapshot() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        assert!(store.storage().get("cart").is_some());

        store.clear_cart().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
        assert_eq!(store.storage().get("cart"), None);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Pen", 9.99, 2)).unwrap();
        store.add_to_cart(NewLineItem::new("Pen", 9.99, 1)).unwrap();

        assert_eq!(store.total(), Decimal::new(2997, 2));
        assert_eq!(store.item_count(), 3);

        store.add_to_cart(NewLineItem::new("Cap", "0.01", 1)).unwrap();
        assert_eq!(store.total(), Decimal::new(2998, 2));
        assert_eq!(store.item_count(), 4);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = ready_store();

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        assert_eq!(
            store.storage().get("cart"),
            Some(r#"[{"name":"Mug","price":10.0,"quantity":1}]"#)
        );

        store.update_quantity("Mug", 2).unwrap();
        assert_eq!(
            store.storage().get("cart"),
            Some(r#"[{"name":"Mug","price":10.0,"quantity":2}]"#)
        );

        store.remove_from_cart("Mug").unwrap();
        assert_eq!(store.storage().get("cart"), Some("[]"));
    }

    #[test]
    fn test_initialize_hydrates_snapshot() {
        let storage = MemoryStorage::with_slot(
            "cart",
            r#"[{"name":"Mug","price":10,"quantity":3},{"name":"Pen","price":"1.5","quantity":1}]"#,
        );
        let mut store = CartStore::new(storage, "cart");
        store.initialize();

        assert_eq!(store.lifecycle(), Lifecycle::Ready);
        assert_eq!(store.len(), 2);
        assert_eq!(store.total(), Decimal::new(315, 1));
        assert!(store.is_durable());
    }

    #[test]
    fn test_initialize_discards_malformed_snapshot() {
        for raw in [
            "not json",
            r#"{"name":"Mug"}"#,
            r#"[{"name":"Mug","price":null,"quantity":1}]"#,
            r#"[{"name":"Mug","price":1,"quantity":1},{"name":"Mug","price":1,"quantity":1}]"#,
        ] {
            let mut store = CartStore::new(MemoryStorage::with_slot("cart", raw), "cart");
            store.initialize();

            assert!(store.is_empty(), "should discard {raw}");
            assert_eq!(store.lifecycle(), Lifecycle::Ready);
            assert!(store.is_durable());
        }
    }

    #[test]
    fn test_initialize_twice_keeps_state() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        store.initialize();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_failure_degrades_to_memory_only() {
        let storage = FlakyStorage {
            fail_reads: true,
            ..FlakyStorage::default()
        };
        let writes = Rc::clone(&storage.writes);
        let mut store = CartStore::new(storage, "cart");

        store.initialize();
        assert!(store.is_empty());
        assert_eq!(store.persistence(), Persistence::MemoryOnly);

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(writes.get(), 0);
    }

    #[test]
    fn test_write_failure_keeps_mutation_and_stops_writing() {
        let storage = FlakyStorage {
            fail_writes: true,
            ..FlakyStorage::default()
        };
        let writes = Rc::clone(&storage.writes);
        let mut store = CartStore::new(storage, "cart");
        store.initialize();

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(writes.get(), 1);
        assert_eq!(store.persistence(), Persistence::MemoryOnly);

        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
        store.clear_cart().unwrap();
        assert_eq!(writes.get(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_failure_still_empties_cart() {
        let mut store = ready_store();
        store.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();

        let mut store = CartStore::new(
            FlakyStorage {
                inner: store.into_storage(),
                fail_writes: true,
                ..FlakyStorage::default()
            },
            "cart",
        );
        store.initialize();
        assert_eq!(store.len(), 1);

        store.clear_cart().unwrap();
        assert!(store.is_empty());
        assert!(!store.is_durable());
    }

    #[test]
    fn test_from_config_memory_only_skips_storage() {
        let config = CartConfig {
            persist: false,
            ..CartConfig::default()
        };
        let storage = MemoryStorage::with_slot("cart", r#"[{"name":"Mug","price":1,"quantity":1}]"#);
        let mut store = CartStore::from_config(storage, &config);
        store.initialize();

        assert!(store.is_empty());
        store.add_to_cart(NewLineItem::new("Pen", 1.0, 1)).unwrap();
        assert_eq!(
            store.storage().get("cart"),
            Some(r#"[{"name":"Mug","price":1,"quantity":1}]"#)
        );
    }
}
