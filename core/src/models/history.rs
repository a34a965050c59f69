// desi_store/src/models/history.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
  Completed,
  Pending,
  Failed,
}

/// One completed search, as shown in the history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
  pub id: String,
  pub source: String,
  pub destination: String,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  /// Suggested activities keyed by destination.
  #[serde(default)]
  pub activities: BTreeMap<String, Vec<String>>,
  pub status: SearchStatus,
  pub timestamp: DateTime<Utc>,
}
