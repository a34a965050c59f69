// desi_store/src/store/memory.rs

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-process store backed by an ordered map.
///
/// An optional byte quota (sum of key and value lengths) mimics the
/// per-origin limit browsers put on local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: RwLock<BTreeMap<String, String>>,
  quota_bytes: Option<usize>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_quota(quota_bytes: usize) -> Self {
    Self {
      entries: RwLock::new(BTreeMap::new()),
      quota_bytes: Some(quota_bytes),
    }
  }

  /// Builds a store pre-populated with `entries`.
  pub fn seeded<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
      quota_bytes: None,
    }
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }

  fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.read().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> StoreResult<()> {
    let mut guard = self.entries.write();
    if let Some(quota) = self.quota_bytes {
      let replaced = guard.get(key).map_or(0, |old| key.len() + old.len());
      let needed = Self::used_bytes(&guard) - replaced + key.len() + value.len();
      if needed > quota {
        return Err(StoreError::QuotaExceeded {
          key: key.to_string(),
          needed,
          quota,
        });
      }
    }
    guard.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> StoreResult<()> {
    self.entries.write().remove(key);
    Ok(())
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    Ok(self.entries.read().keys().cloned().collect())
  }

  fn clear(&self) -> StoreResult<()> {
    self.entries.write().clear();
    Ok(())
  }
}
