// desi_store/src/maintenance/report.rs

//! Structured results returned by the maintenance operations.
//! Failures are carried as data; none of these operations return `Err`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalFailure {
  pub key: String,
  pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
  /// True iff no removal failed.
  pub success: bool,
  pub message: String,
  pub items_removed: Vec<String>,
  pub errors: Vec<RemovalFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
  pub user_accounts: usize,
  pub search_history_entries: usize,
  pub notification_entries: usize,
  /// Number of application-owned keys.
  pub total_data_items: usize,
  pub all_keys: Vec<String>,
  pub app_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
  pub is_clean: bool,
  pub remaining_keys: Vec<String>,
  pub stats: StoreStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetKind {
  /// Every key in the store, owned or not.
  ForceReset,
  /// Application-owned keys only.
  ResetAndReload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetReport {
  pub kind: ResetKind,
  pub success: bool,
  pub message: String,
  pub items_removed: Vec<String>,
  pub errors: Vec<RemovalFailure>,
  pub reload_scheduled: bool,
  pub reload_delay_ms: u64,
}
