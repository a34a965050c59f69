// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use desi_store::{
  CleanupConfig, DataCleanup, KeyValueStore, MemoryStore, ReloadHook, ReloadScheduler, SharedStore, StoreError,
  StoreResult,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const TEST_RELOAD_DELAY: Duration = Duration::from_millis(250);

pub const ACCOUNT_A: &str = "desiDestinations_user_a@x.com";

pub fn account_json(email: &str) -> String {
  format!(
    r#"{{"name":"Asha","email":"{}","passwordHash":"$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g","createdAt":"2024-05-01T10:00:00Z"}}"#,
    email
  )
}

pub fn history_json(entries: usize) -> String {
  let items: Vec<String> = (0..entries)
    .map(|i| {
      format!(
        r#"{{"id":"h{}","source":"Delhi","destination":"Goa","startDate":"2024-06-01","endDate":"2024-06-05","activities":{{"Goa":["Beach"]}},"status":"completed","timestamp":"2024-05-01T08:00:00Z"}}"#,
        i
      )
    })
    .collect();
  format!("[{}]", items.join(","))
}

pub fn unread_notification_json() -> String {
  r#"[{"id":"n1","message":"Your trip is ready","timestamp":"2024-05-01T10:00:00Z","read":false,"type":"success"}]"#
    .to_string()
}

/// The four-key store from the purge scenario.
pub fn seeded_app_store() -> Arc<MemoryStore> {
  Arc::new(MemoryStore::seeded([
    (ACCOUNT_A.to_string(), account_json("a@x.com")),
    ("desiDestinationsEmail".to_string(), "a@x.com".to_string()),
    ("searchHistory".to_string(), history_json(1)),
    ("notifications".to_string(), unread_notification_json()),
  ]))
}

#[derive(Default)]
pub struct CountingHook {
  pub calls: AtomicUsize,
}

impl CountingHook {
  pub fn count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ReloadHook for CountingHook {
  async fn reload(&self) -> StoreResult<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

pub fn cleanup_with_hook(store: SharedStore) -> (DataCleanup, Arc<CountingHook>) {
  let hook = Arc::new(CountingHook::default());
  let scheduler = ReloadScheduler::new(hook.clone());
  let config = CleanupConfig {
    reload_delay: TEST_RELOAD_DELAY,
    ..CleanupConfig::default()
  };
  (DataCleanup::new(store, scheduler, config), hook)
}

pub fn cleanup_for(store: SharedStore) -> DataCleanup {
  cleanup_with_hook(store).0
}

/// Memory store whose removals fail for selected keys, and whose `clear`
/// and `keys` can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
  pub inner: MemoryStore,
  failing_removes: Mutex<HashSet<String>>,
  pub fail_clear: bool,
  pub fail_keys: bool,
}

impl FlakyStore {
  pub fn wrap(inner: MemoryStore) -> Self {
    Self {
      inner,
      ..Self::default()
    }
  }

  pub fn fail_remove_of(&self, key: &str) {
    self.failing_removes.lock().insert(key.to_string());
  }

  pub fn heal(&self) {
    self.failing_removes.lock().clear();
  }
}

impl KeyValueStore for FlakyStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    self.inner.get(key)
  }

  fn set(&self, key: &str, value: &str) -> StoreResult<()> {
    self.inner.set(key, value)
  }

  fn remove(&self, key: &str) -> StoreResult<()> {
    if self.failing_removes.lock().contains(key) {
      return Err(StoreError::Unavailable(format!("remove of '{}' rejected", key)));
    }
    self.inner.remove(key)
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    if self.fail_keys {
      return Err(StoreError::Unavailable("storage disabled".to_string()));
    }
    self.inner.keys()
  }

  fn clear(&self) -> StoreResult<()> {
    if self.fail_clear {
      return Err(StoreError::Unavailable("clear rejected".to_string()));
    }
    self.inner.clear()
  }
}
