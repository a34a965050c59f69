// desi_store/src/records/search.rs

//! Bookkeeping for a finished destination search: history entry plus notification.

use crate::error::{StoreError, StoreResult};
use crate::models::{NotificationKind, SearchRecord, SearchStatus};
use crate::records::{HistoryRepo, NotificationRepo};
use crate::store::SharedStore;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SearchRequest {
  pub source: String,
  pub destination: String,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub activities: BTreeMap<String, Vec<String>>,
}

#[derive(Clone)]
pub struct SearchService {
  history: HistoryRepo,
  notifications: NotificationRepo,
}

impl SearchService {
  pub fn new(store: SharedStore) -> Self {
    Self {
      history: HistoryRepo::new(store.clone()),
      notifications: NotificationRepo::new(store),
    }
  }

  #[instrument(name = "SearchService::complete", skip_all, fields(source = %request.source, destination = %request.destination), err(Display))]
  pub fn complete(&self, request: SearchRequest) -> StoreResult<SearchRecord> {
    let source = request.source.trim().to_string();
    let destination = request.destination.trim().to_string();
    if source.is_empty() || destination.is_empty() {
      return Err(StoreError::Validation("Source and destination are required.".to_string()));
    }
    if request.end_date < request.start_date {
      return Err(StoreError::Validation("End date cannot be before start date.".to_string()));
    }

    let record = SearchRecord {
      id: Uuid::new_v4().to_string(),
      source,
      destination,
      start_date: request.start_date,
      end_date: request.end_date,
      activities: request.activities,
      status: SearchStatus::Completed,
      timestamp: Utc::now(),
    };
    self.history.append(record.clone())?;
    self.notifications.push(
      format!(
        "Your trip from {} to {} ({} to {}) is ready to explore.",
        record.source, record.destination, record.start_date, record.end_date
      ),
      NotificationKind::Success,
    )?;
    info!(id = %record.id, "Search completed and recorded.");
    Ok(record)
  }
}
