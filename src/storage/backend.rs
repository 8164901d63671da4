//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, a string-keyed,
//! string-valued store in the shape of browser local storage. Values are
//! opaque to the store; callers serialize their own data.

use crate::domain::error::Result;

/// Minimal persistent key-value store.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): JSON file with atomic writes (default)
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map
///
/// # Examples
///
/// ```
/// use cinematch::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::default();
/// store.set("greeting", "hola")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hola"));
/// # Ok::<(), cinematch::CinematchError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
