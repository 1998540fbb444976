//! Storefront Cart - Session cart store with durable slot persistence.
//!
//! The store owns the authoritative in-memory cart for one session, keeps it
//! synchronized with a single key in a key/value backend, and exposes the
//! mutation operations UI consumers call in response to user actions.
//!
//! # Architecture
//!
//! - [`CartStore`] - Lifecycle, add/merge/remove/update/clear, derived totals
//! - [`storage`] - The [`SlotStorage`] trait plus memory and file backends
//! - [`CartContext`] - Explicit per-session access point handed to consumers
//! - [`CartSummary`] - Preformatted checkout summary
//! - [`CartConfig`] - Environment configuration
//!
//! Storage failures never reach the caller: reads fall back to an empty cart
//! and writes fall back to in-memory-only operation for the rest of the
//! session. Invalid input is rejected before any state changes.
//!
//! # Example
//!
//! ```
//! use storefront_cart::{CartStore, MemoryStorage};
//! use storefront_cart_core::NewLineItem;
//!
//! let mut cart = CartStore::new(MemoryStorage::new(), "cart");
//! cart.initialize();
//!
//! cart.add_to_cart(NewLineItem::new("Mug", 10.0, 1)).unwrap();
//! cart.add_to_cart(NewLineItem::new("Mug", 10.0, 2)).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total().to_string(), "30");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod error;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod summary;

pub use config::{CartConfig, ConfigError};
pub use context::CartContext;
pub use error::{CartError, Result};
pub use storage::{FileStorage, MemoryStorage, SlotStorage, StorageError};
pub use store::{AddOutcome, CartStore, Lifecycle, Persistence, UpdateOutcome};
pub use summary::{CartSummary, SummaryLine};
