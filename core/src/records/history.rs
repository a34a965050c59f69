// desi_store/src/records/history.rs

use crate::error::{StoreError, StoreResult};
use crate::keys::HISTORY_KEY;
use crate::models::SearchRecord;
use crate::store::{read_json_list, write_json, SharedStore};
use tracing::{debug, warn};

/// Maximum number of searches kept; older ones fall off the end.
pub const HISTORY_CAP: usize = 10;

#[derive(Clone)]
pub struct HistoryRepo {
  store: SharedStore,
}

impl HistoryRepo {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Newest first. Undecodable entries are skipped; a value that is not a
  /// list at all reads as empty.
  pub fn list(&self) -> StoreResult<Vec<SearchRecord>> {
    match read_json_list::<SearchRecord>(self.store.as_ref(), HISTORY_KEY) {
      Ok(records) => Ok(records),
      Err(StoreError::Malformed { source, .. }) => {
        warn!(error = %source, "Search history is malformed; treating as empty.");
        Ok(Vec::new())
      }
      Err(other) => Err(other),
    }
  }

  /// Puts `record` at index 0 and drops anything past the cap.
  pub fn append(&self, record: SearchRecord) -> StoreResult<Vec<SearchRecord>> {
    let mut records = self.list()?;
    records.insert(0, record);
    records.truncate(HISTORY_CAP);
    write_json(self.store.as_ref(), HISTORY_KEY, &records)?;
    debug!(entries = records.len(), "Search history updated.");
    Ok(records)
  }

  pub fn clear(&self) -> StoreResult<()> {
    self.store.remove(HISTORY_KEY)
  }
}
