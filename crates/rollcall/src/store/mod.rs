//! Key-value storage for rollcall.
//!
//! The roster and attendance managers only need string get/set/remove by
//! key, expressed by [`KeyValueStore`]. Values are JSON strings; the
//! managers own their encoding.
//!
//! - [`SqliteStore`]: a single `kv` table in a `SQLite` file.
//! - [`MemoryStore`]: an in-process map with per-key failure injection.

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// A string key-value store.
///
/// Writes overwrite the whole value; there are no partial updates and no
/// transactions spanning several keys.
pub trait KeyValueStore {
    /// Get the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreRead`](crate::Error::StoreRead) if the backing
    /// store could not be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreWrite`](crate::Error::StoreWrite) if the value
    /// could not be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreWrite`](crate::Error::StoreWrite) if the key
    /// could not be removed.
    fn remove(&mut self, key: &str) -> Result<()>;
}
