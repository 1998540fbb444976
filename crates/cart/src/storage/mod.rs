//! Durable key/value slot storage.
//!
//! The cart persists to a single named key. Backends implement
//! [`SlotStorage`]; the store never looks past that trait.
//!
//! - [`MemoryStorage`] - `HashMap`-backed, for tests and throwaway sessions
//! - [`FileStorage`] - One JSON file per key under a directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed (disk full, permissions, ...).
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key contains characters the backend cannot store.
    #[error("Invalid storage key {0:?}: use 1-64 of [A-Za-z0-9_-]")]
    InvalidKey(String),

    /// The backend refused the operation (disabled, quota exceeded, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-valued key/value store that survives the session.
pub trait SlotStorage {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Maximum length of a storage key.
pub const MAX_KEY_LENGTH: usize = 64;

/// Check that `key` is 1-64 characters of `[A-Za-z0-9_-]`.
///
/// Keys double as file names in [`FileStorage`], so the rule is strict.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] if the key breaks the rule.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
