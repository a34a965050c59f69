// desi_store/src/store/mod.rs

//! The key/value store seam.
//!
//! Every component that persists state receives a [`SharedStore`] instead of
//! touching an ambient global. Operations are synchronous and scoped to one
//! store instance; there are no transactions or multi-key atomic writes.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{event, Level};

/// Synchronous string key/value storage, modelled on per-origin browser storage.
pub trait KeyValueStore: Send + Sync {
  /// Returns the value stored under `key`, or `None` if absent.
  fn get(&self, key: &str) -> StoreResult<Option<String>>;

  /// Stores `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> StoreResult<()>;

  /// Removes `key`. Removing an absent key is not an error.
  fn remove(&self, key: &str) -> StoreResult<()>;

  /// Enumerates every key currently present.
  fn keys(&self) -> StoreResult<Vec<String>>;

  /// Removes every key, including ones this application does not own.
  fn clear(&self) -> StoreResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a JSON record. Absent keys yield `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
  match store.get(key)? {
    Some(raw) => serde_json::from_str(&raw)
      .map(Some)
      .map_err(|source| StoreError::Malformed {
        key: key.to_string(),
        source,
      }),
    None => Ok(None),
  }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
  let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
    key: key.to_string(),
    source,
  })?;
  store.set(key, &raw)
}

/// Reads a JSON array one entry at a time.
///
/// Entries that do not decode as `T` are skipped and logged, so one bad entry
/// never hides its neighbours. An absent key is an empty list; a value that is
/// not an array at all is `Malformed`.
pub fn read_json_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Vec<T>> {
  let Some(items) = read_json::<Vec<serde_json::Value>>(store, key)? else {
    return Ok(Vec::new());
  };
  let total = items.len();
  let decoded: Vec<T> = items
    .into_iter()
    .enumerate()
    .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
      Ok(entry) => Some(entry),
      Err(e) => {
        event!(Level::WARN, %key, index, error = %e, "Skipping list entry that does not decode.");
        None
      }
    })
    .collect();
  if decoded.len() < total {
    event!(Level::WARN, %key, kept = decoded.len(), skipped = total - decoded.len(), "List read with entries skipped.");
  }
  Ok(decoded)
}
