// tests/records_tests.rs
mod common;

use chrono::NaiveDate;
use common::*;
use desi_store::records::HISTORY_CAP;
use desi_store::{
  AccountRepo, HistoryRepo, KeyValueStore, MemoryStore, NotificationKind, NotificationRepo, Registration,
  SearchRecord, SearchRequest, SearchService, SearchStatus, StoreError,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn registration(email: &str) -> Registration {
  Registration {
    name: "Asha Rao".to_string(),
    email: email.to_string(),
    password: "namaste123".to_string(),
    phone: Some("+91 98765 43210".to_string()),
  }
}

fn record(id: &str) -> SearchRecord {
  SearchRecord {
    id: id.to_string(),
    source: "Mumbai".to_string(),
    destination: "Jaipur".to_string(),
    start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
    end_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
    activities: BTreeMap::new(),
    status: SearchStatus::Completed,
    timestamp: chrono::Utc::now(),
  }
}

#[test]
fn test_register_writes_account_and_session() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let accounts = AccountRepo::new(store.clone());

  let account = accounts.register(registration("  Asha@X.com ")).unwrap();

  assert_eq!(account.email, "asha@x.com");
  assert_ne!(account.password_hash, "namaste123");
  assert!(account.password_hash.starts_with("$argon2"));
  assert_eq!(store.get("desiDestinationsEmail").unwrap().as_deref(), Some("asha@x.com"));
  let raw = store.get("desiDestinations_user_asha@x.com").unwrap().unwrap();
  assert!(raw.contains("\"passwordHash\""));
  assert!(!raw.contains("namaste123"));
  assert_eq!(accounts.current().unwrap(), Some(account));
}

#[test]
fn test_register_rejects_duplicate_and_invalid_input() {
  setup_tracing();
  let accounts = AccountRepo::new(Arc::new(MemoryStore::new()));
  accounts.register(registration("asha@x.com")).unwrap();

  match accounts.register(registration("ASHA@x.com")) {
    Err(StoreError::DuplicateAccount { email }) => assert_eq!(email, "asha@x.com"),
    other => panic!("Expected DuplicateAccount, got {:?}", other),
  }

  let mut no_at = registration("asha.x.com");
  no_at.email = "asha.x.com".to_string();
  assert!(matches!(accounts.register(no_at), Err(StoreError::Validation(_))));

  let mut short = registration("short@x.com");
  short.password = "abc".to_string();
  assert!(matches!(accounts.register(short), Err(StoreError::Validation(_))));
}

#[test]
fn test_login_logout_cycle() {
  setup_tracing();
  let accounts = AccountRepo::new(Arc::new(MemoryStore::new()));
  accounts.register(registration("asha@x.com")).unwrap();
  accounts.logout().unwrap();
  assert!(accounts.current().unwrap().is_none());

  assert!(matches!(
    accounts.login("asha@x.com", "wrong-password"),
    Err(StoreError::InvalidCredentials)
  ));
  assert!(matches!(
    accounts.login("nobody@x.com", "namaste123"),
    Err(StoreError::InvalidCredentials)
  ));
  assert!(accounts.session_email().unwrap().is_none());

  let account = accounts.login("ASHA@x.com", "namaste123").unwrap();
  assert_eq!(account.email, "asha@x.com");
  assert_eq!(accounts.session_email().unwrap().as_deref(), Some("asha@x.com"));

  accounts.logout().unwrap();
  accounts.logout().unwrap();
  assert!(accounts.session_email().unwrap().is_none());
}

#[test]
fn test_dangling_session_reads_as_logged_out() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let accounts = AccountRepo::new(store.clone());
  accounts.register(registration("asha@x.com")).unwrap();
  store.remove("desiDestinations_user_asha@x.com").unwrap();

  assert_eq!(accounts.session_email().unwrap().as_deref(), Some("asha@x.com"));
  assert!(accounts.current().unwrap().is_none());
}

#[test]
fn test_history_is_capped_and_newest_first() {
  setup_tracing();
  let history = HistoryRepo::new(Arc::new(MemoryStore::new()));

  for i in 0..25 {
    let list = history.append(record(&format!("search-{}", i))).unwrap();
    assert!(list.len() <= HISTORY_CAP);
    assert_eq!(list[0].id, format!("search-{}", i));
  }

  let list = history.list().unwrap();
  assert_eq!(list.len(), HISTORY_CAP);
  assert_eq!(list[0].id, "search-24");
  assert_eq!(list[HISTORY_CAP - 1].id, "search-15");
}

#[test]
fn test_history_recovers_from_corruption() {
  setup_tracing();
  let store = Arc::new(MemoryStore::seeded([("searchHistory", "not json")]));
  let history = HistoryRepo::new(store);

  assert!(history.list().unwrap().is_empty());
  let list = history.append(record("fresh")).unwrap();
  assert_eq!(list.len(), 1);
}

#[test]
fn test_notification_read_flag_is_monotonic() {
  setup_tracing();
  let notifications = NotificationRepo::new(Arc::new(MemoryStore::new()));
  let first = notifications.push("Welcome aboard", NotificationKind::Info).unwrap();
  let second = notifications.push("Trip ready", NotificationKind::Success).unwrap();

  assert_eq!(notifications.unread_count().unwrap(), 2);
  assert_eq!(notifications.list().unwrap()[0].id, second.id);

  assert!(notifications.mark_read(&first.id).unwrap());
  assert!(notifications.mark_read(&first.id).unwrap());
  assert!(!notifications.mark_read("missing").unwrap());
  assert_eq!(notifications.unread_count().unwrap(), 1);

  // Appending more notifications never resets an acknowledged one.
  notifications.push("Another trip", NotificationKind::Success).unwrap();
  let read_back = notifications.list().unwrap();
  let first_again = read_back.iter().find(|n| n.id == first.id).unwrap();
  assert!(first_again.is_read());

  assert_eq!(notifications.mark_all_read().unwrap(), 2);
  assert_eq!(notifications.mark_all_read().unwrap(), 0);
  assert_eq!(notifications.unread_count().unwrap(), 0);
}

#[test]
fn test_notification_wire_format() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let notifications = NotificationRepo::new(store.clone());
  notifications.push("Hello", NotificationKind::Warning).unwrap();

  let raw = store.get("notifications").unwrap().unwrap();
  let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
  let entry = &parsed[0];
  assert_eq!(entry["type"], "warning");
  assert_eq!(entry["read"], false);
  assert_eq!(entry["message"], "Hello");
  assert!(entry["timestamp"].is_string());
  assert!(entry["id"].is_string());
}

#[test]
fn test_completed_search_records_history_and_notifies() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let search = SearchService::new(store.clone());
  let mut activities = BTreeMap::new();
  activities.insert("Jaipur".to_string(), vec!["Amber Fort".to_string(), "Hawa Mahal".to_string()]);

  let saved = search
    .complete(SearchRequest {
      source: " Mumbai ".to_string(),
      destination: "Jaipur".to_string(),
      start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
      end_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
      activities,
    })
    .unwrap();

  assert_eq!(saved.source, "Mumbai");
  assert_eq!(saved.status, SearchStatus::Completed);
  let history = HistoryRepo::new(store.clone()).list().unwrap();
  assert_eq!(history, vec![saved]);

  let notifications = NotificationRepo::new(store.clone()).list().unwrap();
  assert_eq!(notifications.len(), 1);
  assert_eq!(notifications[0].kind, NotificationKind::Success);
  assert!(notifications[0].message.contains("Mumbai"));
  assert!(notifications[0].message.contains("Jaipur"));
  assert!(!notifications[0].is_read());

  let raw = store.get("searchHistory").unwrap().unwrap();
  assert!(raw.contains("\"startDate\":\"2024-11-01\""));
}

#[test]
fn test_search_rejects_inverted_dates() {
  setup_tracing();
  let search = SearchService::new(Arc::new(MemoryStore::new()));
  let result = search.complete(SearchRequest {
    source: "Delhi".to_string(),
    destination: "Goa".to_string(),
    start_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
    end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    activities: BTreeMap::new(),
  });
  assert!(matches!(result, Err(StoreError::Validation(_))));
}

/// Three decodable searches followed by one whose id is a number.
fn mixed_history() -> String {
  let good = history_json(3);
  format!("[{},{}]", &good[1..good.len() - 1], r#"{"id":7,"source":"Delhi"}"#)
}

#[test]
fn test_append_keeps_decodable_history_entries() {
  setup_tracing();
  let store = Arc::new(MemoryStore::seeded([("searchHistory".to_string(), mixed_history())]));
  let history = HistoryRepo::new(store.clone());
  let cleanup = cleanup_for(store.clone());

  assert_eq!(history.list().unwrap().len(), 3);
  assert_eq!(cleanup.stats().search_history_entries, 3);

  history.append(record("fresh")).unwrap();

  let ids: Vec<String> = history.list().unwrap().into_iter().map(|r| r.id).collect();
  assert_eq!(ids, vec!["fresh", "h0", "h1", "h2"]);
  assert_eq!(cleanup.stats().search_history_entries, 4);
}

#[test]
fn test_push_keeps_decodable_notifications() {
  setup_tracing();
  let good = unread_notification_json();
  let mixed = format!("[{},{}]", &good[1..good.len() - 1], r#"{"id":"n2"}"#);
  let store = Arc::new(MemoryStore::seeded([("notifications".to_string(), mixed)]));
  let notifications = NotificationRepo::new(store.clone());

  assert_eq!(notifications.unread_count().unwrap(), 1);
  let pushed = notifications.push("Another trip", NotificationKind::Info).unwrap();

  let ids: Vec<String> = notifications.list().unwrap().into_iter().map(|n| n.id).collect();
  assert_eq!(ids, vec![pushed.id, "n1".to_string()]);
  assert_eq!(cleanup_for(store).stats().notification_entries, 2);
}
