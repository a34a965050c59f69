// desi_store/src/records/notifications.rs

use crate::error::{StoreError, StoreResult};
use crate::keys::NOTIFICATIONS_KEY;
use crate::models::{Notification, NotificationKind};
use crate::store::{read_json_list, write_json, SharedStore};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationRepo {
  store: SharedStore,
}

impl NotificationRepo {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Newest first. Undecodable entries are skipped; a value that is not a
  /// list at all reads as empty.
  pub fn list(&self) -> StoreResult<Vec<Notification>> {
    match read_json_list::<Notification>(self.store.as_ref(), NOTIFICATIONS_KEY) {
      Ok(items) => Ok(items),
      Err(StoreError::Malformed { source, .. }) => {
        warn!(error = %source, "Notification list is malformed; treating as empty.");
        Ok(Vec::new())
      }
      Err(other) => Err(other),
    }
  }

  pub fn push(&self, message: impl Into<String>, kind: NotificationKind) -> StoreResult<Notification> {
    let notification = Notification::new(Uuid::new_v4().to_string(), message, kind, Utc::now());
    let mut items = self.list()?;
    items.insert(0, notification.clone());
    write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &items)?;
    debug!(id = %notification.id, "Notification added.");
    Ok(notification)
  }

  /// Returns false when no notification has that id.
  pub fn mark_read(&self, id: &str) -> StoreResult<bool> {
    let mut items = self.list()?;
    let Some(target) = items.iter_mut().find(|n| n.id == id) else {
      return Ok(false);
    };
    if target.mark_read() {
      write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &items)?;
    }
    Ok(true)
  }

  /// Returns how many notifications changed from unread to read.
  pub fn mark_all_read(&self) -> StoreResult<usize> {
    let mut items = self.list()?;
    let changed = items.iter_mut().map(Notification::mark_read).filter(|changed| *changed).count();
    if changed > 0 {
      write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &items)?;
    }
    Ok(changed)
  }

  pub fn unread_count(&self) -> StoreResult<usize> {
    Ok(self.list()?.iter().filter(|n| !n.is_read()).count())
  }
}
