//! Best-effort persistence of named state slices.
//!
//! State is stored as JSON strings in a [`KeyValueStore`]. A [`Slice`] binds a
//! key to a typed value and never surfaces failures to its caller: a missing,
//! unreadable or corrupt slice loads as the type's default, and a failed write
//! is logged and otherwise ignored. In-memory state stays the source of truth.

mod file;
mod memory;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{trace, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key of the cart slice.
pub const CART_KEY: &str = "greenshop-cart";
/// Storage key of the favorites slice.
pub const FAVORITES_KEY: &str = "greenshop-favorites";

/// Whether a persisted engine has loaded its stored state yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not hydrated: changes stay in memory and are not written.
    #[default]
    Uninitialized,
    /// Hydrated: every change is written through.
    Ready,
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable string key-value storage.
///
/// Implementations overwrite whole values; there are no partial updates.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value for `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A typed, named piece of persisted state.
pub struct Slice<T> {
    key: String,
    store: Arc<dyn KeyValueStore>,
    _value: PhantomData<fn() -> T>,
}

impl<T> Slice<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Bind `key` in `store` to values of type `T`.
    pub fn new(key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            store,
            _value: PhantomData,
        }
    }

    /// Load the slice, falling back to `T::default()` when it is absent, the
    /// backend fails, or the stored value does not parse.
    pub fn load(&self) -> T {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                trace!(key = %self.key, "No stored slice");
                return T::default();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored slice, starting empty");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Stored slice is corrupt, starting empty");
            T::default()
        })
    }

    /// Serialize and write the slice.
    ///
    /// Returns whether the write succeeded. Failures are logged, never raised.
    pub fn save(&self, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize slice");
                return false;
            }
        };

        match self.store.set(&self.key, &json) {
            Ok(()) => {
                trace!(key = %self.key, bytes = json.len(), "Saved slice");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to save slice, keeping in-memory state");
                false
            }
        }
    }
}

impl<T> fmt::Debug for Slice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Whether `key` is safe to use as a storage key (and file name).
pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
