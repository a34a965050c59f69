// desi_store/src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  Info,
  Success,
  Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id: String,
  pub message: String,
  pub timestamp: DateTime<Utc>,
  // Only ever flipped to true, see `mark_read`.
  read: bool,
  #[serde(rename = "type")]
  pub kind: NotificationKind,
}

impl Notification {
  pub fn new(id: impl Into<String>, message: impl Into<String>, kind: NotificationKind, timestamp: DateTime<Utc>) -> Self {
    Self {
      id: id.into(),
      message: message.into(),
      timestamp,
      read: false,
      kind,
    }
  }

  pub fn is_read(&self) -> bool {
    self.read
  }

  /// Returns true if this call changed the flag.
  pub fn mark_read(&mut self) -> bool {
    let changed = !self.read;
    self.read = true;
    changed
  }
}
