//! Per-session access point for cart consumers.
//!
//! A [`CartContext`] owns the session's [`CartStore`] and is cloned into
//! every consumer that needs the cart, instead of reaching for a global.
//! Clones share one store. Consumers read through [`CartContext::snapshot`]
//! or [`CartContext::with_cart`] and change the cart only through the
//! delegating operations.
//!
//! The context is single-threaded (`Rc<RefCell<_>>`): each operation borrows
//! the store for its whole read-modify-write and releases it before
//! returning.

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use storefront_cart_core::{LineItem, NewLineItem};

use crate::error::Result;
use crate::storage::SlotStorage;
use crate::store::{AddOutcome, CartStore, UpdateOutcome};
use crate::summary::CartSummary;

/// Shared handle to the session cart.
///
/// # Panics
///
/// Operations panic if called from inside a [`CartContext::with_cart`]
/// closure on the same context; the store is already borrowed there.
#[derive(Debug)]
pub struct CartContext<S> {
    inner: Rc<RefCell<CartStore<S>>>,
}

impl<S> Clone for CartContext<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: SlotStorage> CartContext<S> {
    /// Take ownership of the session store, initializing it if needed.
    pub fn provide(mut store: CartStore<S>) -> Self {
        store.initialize();
        Self {
            inner: Rc::new(RefCell::new(store)),
        }
    }

    /// See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the item is invalid or would push the cart total
    /// out of range.
    pub fn add_to_cart(&self, item: NewLineItem) -> Result<AddOutcome> {
        self.inner.borrow_mut().add_to_cart(item)
    }

    /// See [`CartStore::remove_from_cart`].
    ///
    /// # Errors
    ///
    /// Never fails once provided; the signature mirrors the store.
    pub fn remove_from_cart(&self, name: &str) -> Result<bool> {
        self.inner.borrow_mut().remove_from_cart(name)
    }

    /// See [`CartStore::update_quantity`].
    ///
    /// # Errors
    ///
    /// Never fails once provided; the signature mirrors the store.
    pub fn update_quantity(&self, name: &str, quantity: u32) -> Result<UpdateOutcome> {
        self.inner.borrow_mut().update_quantity(name, quantity)
    }

    /// See [`CartStore::clear_cart`].
    ///
    /// # Errors
    ///
    /// Never fails once provided; the signature mirrors the store.
    pub fn clear_cart(&self) -> Result<()> {
        self.inner.borrow_mut().clear_cart()
    }

    /// Current cart total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.inner.borrow().total()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.inner.borrow().item_count()
    }

    /// Owned copy of the current lines. Changing it does not touch the cart.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.inner.borrow().items().to_vec()
    }

    /// Checkout summary of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(&*self.inner.borrow())
    }

    /// Run `f` with read access to the store.
    pub fn with_cart<R>(&self, f: impl FnOnce(&CartStore<S>) -> R) -> R {
        f(&self.inner.borrow())
    }
}
