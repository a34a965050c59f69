// desi_store/src/maintenance/sweep.rs

//! Context and steps shared by the maintenance routines.

use crate::keys::{KeyPartition, KeyRegistry, HISTORY_KEY, NOTIFICATIONS_KEY};
use crate::maintenance::report::RemovalFailure;
use crate::models::{Notification, SearchRecord};
use crate::routine::{Routine, SkipCondition, StepControl};
use crate::store::{read_json_list, KeyValueStore, SharedStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{event, Level};

pub(crate) struct SweepCtx {
  pub store: SharedStore,
  pub registry: Arc<KeyRegistry>,
  /// Keys as enumerated at the start of the run. Later steps work from this
  /// snapshot, never from a fresh listing.
  pub all_keys: Vec<String>,
  /// False when enumeration failed and `all_keys` is an empty stand-in.
  pub snapshot_complete: bool,
  pub partition: KeyPartition,
  pub removed: Vec<String>,
  pub failures: Vec<RemovalFailure>,
  /// Set when the whole store was cleared but which keys it held is unknown.
  pub cleared_unknown: bool,
  // Decodable entries only, so stats agree with what the repositories read back.
  pub history_entries: usize,
  pub notification_entries: usize,
}

impl SweepCtx {
  pub fn new(store: SharedStore, registry: Arc<KeyRegistry>) -> Self {
    Self {
      store,
      registry,
      all_keys: Vec::new(),
      snapshot_complete: true,
      partition: KeyPartition::default(),
      removed: Vec::new(),
      failures: Vec::new(),
      cleared_unknown: false,
      history_entries: 0,
      notification_entries: 0,
    }
  }
}

/// Snapshot of every key. An unreadable store degrades to no keys.
fn snapshot_keys(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  ctx.all_keys = match ctx.store.keys() {
    Ok(keys) => keys,
    Err(e) => {
      // Purge and stats carry on with nothing to act on; only a wipe can still do work.
      event!(Level::WARN, error = %e, "Key enumeration failed; treating store as empty.");
      ctx.snapshot_complete = false;
      Vec::new()
    }
  };
  event!(Level::DEBUG, keys = ctx.all_keys.len(), "Keys enumerated.");
  Ok(StepControl::Continue)
}

fn classify_keys(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  ctx.partition = KeyPartition::from_keys(&ctx.registry, &ctx.all_keys);
  event!(
    Level::DEBUG,
    accounts = ctx.partition.accounts.len(),
    session = ctx.partition.session.len(),
    history = ctx.partition.history.len(),
    notifications = ctx.partition.notifications.len(),
    heuristic = ctx.partition.heuristic.len(),
    foreign = ctx.partition.foreign.len(),
    "Keys classified."
  );
  if !ctx.partition.heuristic.is_empty() {
    event!(Level::INFO, keys = ?ctx.partition.heuristic, "Unregistered keys matched the ownership heuristic.");
  }
  Ok(StepControl::Continue)
}

/// Registered after `classify_keys` in the purge routine so an empty store ends the run early.
fn stop_when_nothing_owned(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  if ctx.partition.owned_len() == 0 {
    event!(Level::INFO, "No application-owned keys present.");
    return Ok(StepControl::Stop);
  }
  Ok(StepControl::Continue)
}

/// Best-effort: every owned key is attempted, failures are collected.
fn remove_owned(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  for key in ctx.partition.owned() {
    remove_one(ctx.store.as_ref(), key, &mut ctx.removed, &mut ctx.failures);
  }
  Ok(StepControl::Continue)
}

fn remove_one(store: &dyn KeyValueStore, key: String, removed: &mut Vec<String>, failures: &mut Vec<RemovalFailure>) {
  match store.remove(&key) {
    Ok(()) => {
      event!(Level::DEBUG, %key, "Key removed.");
      removed.push(key);
    }
    Err(e) => {
      event!(Level::WARN, %key, error = %e, "Key removal failed; continuing.");
      failures.push(RemovalFailure {
        key,
        reason: e.to_string(),
      });
    }
  }
}

fn count_records(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  ctx.history_entries = count_entries::<SearchRecord>(ctx.store.as_ref(), HISTORY_KEY);
  ctx.notification_entries = count_entries::<Notification>(ctx.store.as_ref(), NOTIFICATIONS_KEY);
  Ok(StepControl::Continue)
}

/// Number of entries under `key` that decode as `T`. A read failure or a
/// value that is not a list counts as zero.
fn count_entries<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> usize {
  match read_json_list::<T>(store, key) {
    Ok(entries) => entries.len(),
    Err(e) => {
      event!(Level::WARN, %key, error = %e, "Stored list is unreadable; counting as zero.");
      0
    }
  }
}

/// Wipes the whole store, falling back to key-by-key removal if `clear` fails.
fn clear_store(ctx: &mut SweepCtx) -> crate::StoreResult<StepControl> {
  match ctx.store.clear() {
    Ok(()) => {
      ctx.removed = ctx.all_keys.clone();
      // The snapshot was a stand-in, so the count above says nothing about what went.
      ctx.cleared_unknown = !ctx.snapshot_complete;
      event!(Level::INFO, removed = ctx.removed.len(), complete = ctx.snapshot_complete, "Store cleared.");
    }
    Err(e) => {
      // Best effort: whatever the snapshot saw is removed individually.
      event!(Level::WARN, error = %e, "Store clear failed; removing keys one by one.");
      for key in ctx.all_keys.clone() {
        remove_one(ctx.store.as_ref(), key, &mut ctx.removed, &mut ctx.failures);
      }
    }
  }
  Ok(StepControl::Continue)
}

pub(crate) fn purge_routine() -> Routine<SweepCtx> {
  let mut routine = Routine::new(
    "purge_all",
    &[
      ("snapshot_keys", false, None),
      ("classify_keys", false, None),
      ("remove_owned", false, None),
    ],
  );
  routine.on("snapshot_keys", snapshot_keys);
  routine.on("classify_keys", classify_keys);
  routine.on("classify_keys", stop_when_nothing_owned);
  routine.on("remove_owned", remove_owned);
  routine
}

pub(crate) fn stats_routine() -> Routine<SweepCtx> {
  let no_record_lists: SkipCondition<SweepCtx> =
    Arc::new(|ctx: &SweepCtx| ctx.partition.history.is_empty() && ctx.partition.notifications.is_empty());
  let mut routine = Routine::new(
    "stats",
    &[
      ("snapshot_keys", false, None),
      ("classify_keys", false, None),
      ("count_records", true, Some(no_record_lists)),
    ],
  );
  routine.on("snapshot_keys", snapshot_keys);
  routine.on("classify_keys", classify_keys);
  routine.on("count_records", count_records);
  routine
}

pub(crate) fn wipe_routine() -> Routine<SweepCtx> {
  let mut routine = Routine::new("force_reset", &[("snapshot_keys", false, None), ("clear_store", false, None)]);
  routine.on("snapshot_keys", snapshot_keys);
  routine.on("clear_store", clear_store);
  routine
}
