//! Decoding and encoding of stored JSON values.
//!
//! There are two ways to read. The tolerant readers never fail: a missing
//! key, a store read error, unparseable JSON or a value of the wrong shape
//! all decode to an empty collection, with a warning logged. They back the
//! read-only views. The strict readers report those same failures as
//! [`Error::StoreRead`] and back every load that is followed by a full
//! rewrite of the key, so a bad read never overwrites good data.
//!
//! In both modes individual entries that fail to decode or validate are
//! skipped and the rest are kept.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Post-decode checks for stored entries.
pub trait Validate {
    /// Reject entries that parsed but are not usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Read and parse the JSON stored under `key`.
///
/// A missing key is `Ok(None)`.
///
/// # Errors
///
/// Returns the store's read error, or [`Error::StoreRead`] if the stored
/// text is not JSON.
pub fn read_json_strict<S>(store: &S, key: &str) -> Result<Option<Value>>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        debug!("No value stored under '{}'", key);
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::store_read(key, format!("unparseable JSON: {e}")))
}

/// Read and parse the JSON stored under `key`, or `None` if there is nothing usable.
pub fn read_json<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<Value> {
    read_json_strict(store, key).unwrap_or_else(|e| {
        warn!("Treating '{}' as absent: {}", key, e);
        None
    })
}

/// Read the JSON array stored under `key` without decoding its entries.
///
/// A missing key is an empty array.
///
/// # Errors
///
/// Returns an error if the read fails, the text is not JSON or the value is
/// not an array.
pub fn read_array_strict<S>(store: &S, key: &str) -> Result<Vec<Value>>
where
    S: KeyValueStore + ?Sized,
{
    match read_json_strict(store, key)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::store_read(
            key,
            format!("expected an array, found {}", kind(&other)),
        )),
    }
}

/// Load a JSON array stored under `key`, keeping only entries that decode and validate.
///
/// # Errors
///
/// See [`read_array_strict`].
pub fn load_list_strict<T, S>(store: &S, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
    S: KeyValueStore + ?Sized,
{
    Ok(read_array_strict(store, key)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| decode_entry(key, &index.to_string(), item))
        .collect())
}

/// Tolerant form of [`load_list_strict`].
pub fn load_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned + Validate,
    S: KeyValueStore + ?Sized,
{
    load_list_strict(store, key).unwrap_or_else(|e| {
        warn!("Treating '{}' as absent: {}", key, e);
        Vec::new()
    })
}

/// Load a JSON object stored under `key`, keeping only entries that decode and validate.
pub fn load_map<V, S>(store: &S, key: &str) -> BTreeMap<String, V>
where
    V: DeserializeOwned + Validate,
    S: KeyValueStore + ?Sized,
{
    match read_json(store, key) {
        None => BTreeMap::new(),
        Some(Value::Object(entries)) => entries
            .into_iter()
            .filter_map(|(name, item)| decode_entry(key, &name, item).map(|v| (name, v)))
            .collect(),
        Some(other) => {
            warn!(
                "Treating '{}' as absent: expected an object, found {}",
                key,
                kind(&other)
            );
            BTreeMap::new()
        }
    }
}

/// Serialize `value` and overwrite `key` with it.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Decode one entry of `key`, logging and returning `None` if it is unusable.
pub(crate) fn decode_entry<T: DeserializeOwned + Validate>(
    key: &str,
    entry: &str,
    item: Value,
) -> Option<T> {
    let decoded: T = match serde_json::from_value(item) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Skipping malformed entry {} in '{}': {}", entry, key, e);
            return None;
        }
    };
    if let Err(reason) = decoded.validate() {
        warn!("Skipping invalid entry {} in '{}': {}", entry, key, reason);
        return None;
    }
    Some(decoded)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
