// tests/store_tests.rs
mod common;

use common::*;
use desi_store::keys::{account_key, KeyClass, KeyPartition, KeyRegistry};
use desi_store::store::{read_json, read_json_list, write_json};
use desi_store::{FileStore, KeyValueStore, MemoryStore, StoreError, UserAccount};
use std::fs;

#[test]
fn test_memory_store_basic_operations() {
  let store = MemoryStore::new();
  assert_eq!(store.get("missing").unwrap(), None);

  store.set("b", "2").unwrap();
  store.set("a", "1").unwrap();
  store.set("a", "one").unwrap();
  assert_eq!(store.get("a").unwrap().as_deref(), Some("one"));
  assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

  store.remove("a").unwrap();
  store.remove("a").unwrap();
  assert_eq!(store.len(), 1);

  store.clear().unwrap();
  assert!(store.is_empty());
}

#[test]
fn test_memory_store_quota() {
  let store = MemoryStore::with_quota(10);
  store.set("k", "12345").unwrap(); // 6 bytes
  store.set("k", "123456789").unwrap(); // replacing: 10 bytes

  match store.set("x", "1") {
    Err(StoreError::QuotaExceeded { key, needed, quota }) => {
      assert_eq!(key, "x");
      assert_eq!(needed, 12);
      assert_eq!(quota, 10);
    }
    other => panic!("Expected QuotaExceeded, got {:?}", other),
  }
  assert_eq!(store.get("x").unwrap(), None);
}

#[test]
fn test_json_helpers_surface_malformed_records() {
  let store = MemoryStore::seeded([(account_key("a@x.com"), "{oops".to_string())]);
  match read_json::<UserAccount>(&store, &account_key("a@x.com")) {
    Err(StoreError::Malformed { key, .. }) => assert_eq!(key, "desiDestinations_user_a@x.com"),
    other => panic!("Expected Malformed, got {:?}", other),
  }
  assert!(read_json::<UserAccount>(&store, "absent").unwrap().is_none());

  write_json(&store, "numbers", &vec![1, 2, 3]).unwrap();
  assert_eq!(read_json::<Vec<u8>>(&store, "numbers").unwrap(), Some(vec![1, 2, 3]));
}

#[test]
fn test_list_reader_skips_only_bad_entries() {
  setup_tracing();
  let store = MemoryStore::seeded([
    ("mixed", r#"[1, "two", 3, null]"#),
    ("scalar", "17"),
  ]);

  assert_eq!(read_json_list::<u8>(&store, "mixed").unwrap(), vec![1, 3]);
  assert!(read_json_list::<u8>(&store, "absent").unwrap().is_empty());
  assert!(matches!(
    read_json_list::<u8>(&store, "scalar"),
    Err(StoreError::Malformed { .. })
  ));
}

#[test]
fn test_registry_classification() {
  let registry = KeyRegistry::standard();
  assert_eq!(registry.classify("desiDestinations_user_a@x.com"), KeyClass::Account);
  assert_eq!(registry.classify("desiDestinationsEmail"), KeyClass::Session);
  assert_eq!(registry.classify("searchHistory"), KeyClass::History);
  assert_eq!(registry.classify("notifications"), KeyClass::Notifications);
  assert_eq!(registry.classify("OAuthState"), KeyClass::Heuristic);
  assert_eq!(registry.classify("theme"), KeyClass::Foreign);
  assert!(!registry.is_owned("theme"));

  let strict = KeyRegistry::standard().without_heuristic();
  assert!(!strict.heuristic_enabled());
  assert_eq!(strict.classify("OAuthState"), KeyClass::Foreign);

  let keys: Vec<String> = ["theme", "userPrefs", "notifications", "desiDestinations_user_b@x.com"]
    .iter()
    .map(|k| k.to_string())
    .collect();
  let partition = KeyPartition::from_keys(&registry, &keys);
  assert_eq!(partition.owned_len(), 3);
  assert_eq!(
    partition.owned(),
    vec!["desiDestinations_user_b@x.com", "notifications", "userPrefs"]
  );
  assert_eq!(partition.foreign, vec!["theme".to_string()]);
}

#[test]
fn test_file_store_persists_between_opens() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("profile").join("storage.json");

  {
    let store = FileStore::open(&path).unwrap();
    assert!(store.keys().unwrap().is_empty());
    store.set("searchHistory", "[]").unwrap();
    store.set("theme", "dark").unwrap();
    store.remove("theme").unwrap();
  }

  let reopened = FileStore::open(&path).unwrap();
  assert_eq!(reopened.keys().unwrap(), vec!["searchHistory".to_string()]);
  assert_eq!(reopened.get("searchHistory").unwrap().as_deref(), Some("[]"));
  assert_eq!(reopened.path(), path.as_path());

  reopened.clear().unwrap();
  let raw = fs::read_to_string(&path).unwrap();
  assert_eq!(raw.trim(), "{}");
}

#[test]
fn test_file_store_moves_undecodable_file_aside() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("storage.json");
  fs::write(&path, r#"{"searchHistory": 42}"#).unwrap();

  let store = FileStore::open(&path).unwrap();

  assert!(store.keys().unwrap().is_empty());
  let quarantined = FileStore::corrupt_path(&path);
  assert_eq!(quarantined, dir.path().join("storage.json.corrupt"));
  assert_eq!(fs::read_to_string(&quarantined).unwrap(), r#"{"searchHistory": 42}"#);
  assert!(!path.exists());

  // The recovered store is fully usable.
  store.set("theme", "dark").unwrap();
  assert_eq!(FileStore::open(&path).unwrap().keys().unwrap(), vec!["theme".to_string()]);
}

#[test]
fn test_file_store_open_names_path_on_io_failure() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("storage.json");
  fs::create_dir(&path).unwrap();

  match FileStore::open(&path) {
    Err(StoreError::Backend { op, key, .. }) => {
      assert_eq!(op, "open");
      assert_eq!(key, path.display().to_string());
    }
    other => panic!("Expected Backend error, got {:?}", other.map(|_| ())),
  }
}

#[test]
fn test_file_store_rolls_back_when_write_fails() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("storage.json");
  let store = FileStore::open(&path).unwrap();
  store.set("kept", "1").unwrap();

  // A directory where the temp file should go makes the write fail.
  fs::create_dir(dir.path().join("storage.json.tmp")).unwrap();

  match store.set("lost", "2") {
    Err(StoreError::Backend { op, key, .. }) => {
      assert_eq!(op, "set");
      assert_eq!(key, "lost");
    }
    other => panic!("Expected Backend error, got {:?}", other),
  }
  assert_eq!(store.get("lost").unwrap(), None);
  assert_eq!(store.keys().unwrap(), vec!["kept".to_string()]);
}
