use std::collections::{BTreeMap, BTreeSet};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// In-process key-value store.
///
/// Nothing is persisted. Reads and writes can be made to fail per key,
/// which is how callers exercise the store-error paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    failing_reads: BTreeSet<String>,
    failing_writes: BTreeSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` of `key` fail.
    pub fn fail_reads_for(&mut self, key: impl Into<String>) {
        self.failing_reads.insert(key.into());
    }

    /// Make every subsequent `set` or `remove` of `key` fail.
    pub fn fail_writes_for(&mut self, key: impl Into<String>) {
        self.failing_writes.insert(key.into());
    }

    /// Clear all injected failures.
    pub fn heal(&mut self) {
        self.failing_reads.clear();
        self.failing_writes.clear();
    }

    /// All stored keys, ascending.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Check whether `key` holds a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.failing_reads.contains(key) {
            return Err(Error::store_read(key, "injected read failure"));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(Error::store_write(key, "injected write failure"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(Error::store_write(key, "injected write failure"));
        }
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("students", "[]").unwrap();
        assert_eq!(store.get("students").unwrap().as_deref(), Some("[]"));
        assert!(store.contains_key("students"));

        store.remove("students").unwrap();
        assert!(store.get("students").unwrap().is_none());
        assert!(store.remove("students").is_ok());
    }

    #[test]
    fn test_injected_failures() {
        let mut store = MemoryStore::new();
        store.set("attendance_history", "[]").unwrap();
        store.fail_reads_for("attendance_history");
        store.fail_writes_for("students");

        assert!(matches!(
            store.get("attendance_history"),
            Err(Error::StoreRead { .. })
        ));
        assert!(store.set("students", "[]").unwrap_err().is_store_write_error());
        assert!(store.remove("students").unwrap_err().is_store_write_error());

        store.heal();
        assert!(store.get("attendance_history").unwrap().is_some());
        assert!(store.set("students", "[]").is_ok());
    }

    #[test]
    fn test_keys_sorted() {
        let mut store = MemoryStore::new();
        store.set("students", "[]").unwrap();
        store.set("attendance_history", "[]").unwrap();
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["attendance_history", "students"]);
    }
}
