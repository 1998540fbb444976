//! Integration tests for the storefront cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Snapshots surviving across fresh store instances
//! - `cart_scenarios` - End-to-end consumer flows through `CartContext`
//!
//! This library holds the shared fixtures those tests use.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::Cell;
use std::rc::Rc;

use storefront_cart::{CartStore, MemoryStorage, SlotStorage, StorageError};

/// Open and initialize a store over `storage`, as a new session would.
pub fn open_session<S: SlotStorage>(storage: S) -> CartStore<S> {
    let mut store = CartStore::new(storage, "cart");
    store.initialize();
    store
}

/// Which storage operations [`UnreliableStorage`] refuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub reads: bool,
    pub writes: bool,
}

/// Storage wrapper that can refuse operations and counts the calls it gets.
///
/// Stands in for a browser with storage disabled or over quota.
#[derive(Debug, Default)]
pub struct UnreliableStorage {
    pub inner: MemoryStorage,
    pub faults: Faults,
    calls: Rc<Cell<usize>>,
}

impl UnreliableStorage {
    /// Wrap `inner`, refusing the operations named in `faults`.
    #[must_use]
    pub fn new(inner: MemoryStorage, faults: Faults) -> Self {
        Self {
            inner,
            faults,
            calls: Rc::default(),
        }
    }

    /// Shared counter of every read, write and remove call.
    #[must_use]
    pub fn call_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }

    fn record(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl SlotStorage for UnreliableStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.record();
        if self.faults.reads {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        self.inner.read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.record();
        if self.faults.writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.record();
        if self.faults.writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.remove(key)
    }
}
