// desi_store/src/maintenance/mod.rs

//! Store maintenance: purge application data, report what is stored, verify
//! a purge left nothing behind, and reset the client.
//!
//! All operations are best-effort and non-atomic. A removal that fails is
//! recorded in the returned report and the sweep moves on; nothing is rolled
//! back or retried. A later `verify_empty` reports any residue.

pub mod reload;
pub mod report;
mod sweep;

pub use reload::{ReloadHook, ReloadScheduler, ReloadTicket};
pub use report::{PurgeReport, RemovalFailure, ResetKind, ResetReport, StoreStats, VerifyReport};

use crate::keys::KeyRegistry;
use crate::routine::{Routine, RoutineOutcome};
use crate::store::SharedStore;
use std::sync::Arc;
use std::time::Duration;
use sweep::SweepCtx;
use tracing::{event, instrument, Level};

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct CleanupConfig {
  /// Pause between a reset and the client reload.
  pub reload_delay: Duration,
  /// Whether unregistered keys containing `user`/`auth`/`login`/`session` count as owned.
  pub key_heuristic: bool,
}

impl Default for CleanupConfig {
  fn default() -> Self {
    Self {
      reload_delay: DEFAULT_RELOAD_DELAY,
      key_heuristic: true,
    }
  }
}

/// Result of a reset: the report plus the pending reload, if one was scheduled.
#[derive(Debug)]
pub struct ResetOutcome {
  pub report: ResetReport,
  pub reload: Option<ReloadTicket>,
}

pub struct DataCleanup {
  store: SharedStore,
  registry: Arc<KeyRegistry>,
  scheduler: ReloadScheduler,
  reload_delay: Duration,
  purge: Routine<SweepCtx>,
  stats: Routine<SweepCtx>,
  wipe: Routine<SweepCtx>,
}

impl DataCleanup {
  pub fn new(store: SharedStore, scheduler: ReloadScheduler, config: CleanupConfig) -> Self {
    let registry = if config.key_heuristic {
      KeyRegistry::standard()
    } else {
      KeyRegistry::standard().without_heuristic()
    };
    Self {
      store,
      registry: Arc::new(registry),
      scheduler,
      reload_delay: config.reload_delay,
      purge: sweep::purge_routine(),
      stats: sweep::stats_routine(),
      wipe: sweep::wipe_routine(),
    }
  }

  fn sweep(&self, routine: &Routine<SweepCtx>) -> (SweepCtx, RoutineOutcome) {
    let mut ctx = SweepCtx::new(Arc::clone(&self.store), Arc::clone(&self.registry));
    let outcome = match routine.run(&mut ctx) {
      Ok(outcome) => outcome,
      Err(e) => {
        event!(Level::ERROR, routine = routine.name(), error = %e, "Maintenance routine aborted.");
        ctx.failures.push(RemovalFailure {
          key: format!("<{}>", routine.name()),
          reason: e.to_string(),
        });
        RoutineOutcome::Stopped
      }
    };
    (ctx, outcome)
  }

  /// Removes every application-owned key.
  #[instrument(name = "DataCleanup::purge_all", skip(self))]
  pub fn purge_all(&self) -> PurgeReport {
    let (ctx, outcome) = self.sweep(&self.purge);
    let success = ctx.failures.is_empty();
    let message = if outcome == RoutineOutcome::Stopped && success {
      "No application data found; nothing to remove.".to_string()
    } else if success {
      format!("Removed {} application data item(s).", ctx.removed.len())
    } else {
      format!(
        "Removed {} item(s); {} item(s) could not be removed.",
        ctx.removed.len(),
        ctx.failures.len()
      )
    };
    event!(Level::INFO, removed = ctx.removed.len(), failed = ctx.failures.len(), "Purge finished.");
    PurgeReport {
      success,
      message,
      items_removed: ctx.removed,
      errors: ctx.failures,
    }
  }

  #[instrument(name = "DataCleanup::stats", skip(self))]
  pub fn stats(&self) -> StoreStats {
    let (ctx, _) = self.sweep(&self.stats);
    let app_keys = ctx.partition.owned();
    StoreStats {
      user_accounts: ctx.partition.accounts.len(),
      search_history_entries: ctx.history_entries,
      notification_entries: ctx.notification_entries,
      total_data_items: app_keys.len(),
      all_keys: ctx.all_keys,
      app_keys,
    }
  }

  #[instrument(name = "DataCleanup::verify_empty", skip(self))]
  pub fn verify_empty(&self) -> VerifyReport {
    let stats = self.stats();
    let is_clean = stats.total_data_items == 0;
    if !is_clean {
      event!(Level::WARN, remaining = stats.total_data_items, "Application data still present.");
    }
    VerifyReport {
      is_clean,
      remaining_keys: stats.app_keys.clone(),
      stats,
    }
  }

  /// Clears the entire store, then schedules a reload whatever the outcome.
  #[instrument(name = "DataCleanup::force_reset", skip(self))]
  pub fn force_reset(&self) -> ResetOutcome {
    let (ctx, _) = self.sweep(&self.wipe);
    let success = ctx.failures.is_empty();
    let message = if success && ctx.cleared_unknown {
      "Store cleared (key count unknown).".to_string()
    } else if success {
      format!("Store cleared ({} key(s)).", ctx.removed.len())
    } else {
      format!(
        "Store partially cleared: {} key(s) removed, {} failed.",
        ctx.removed.len(),
        ctx.failures.len()
      )
    };
    self.finish_reset(ResetKind::ForceReset, success, message, ctx.removed, ctx.failures)
  }

  /// Purges application data, then schedules a reload even if the purge was incomplete.
  #[instrument(name = "DataCleanup::reset_and_reload", skip(self))]
  pub fn reset_and_reload(&self) -> ResetOutcome {
    let purge = self.purge_all();
    self.finish_reset(
      ResetKind::ResetAndReload,
      purge.success,
      purge.message,
      purge.items_removed,
      purge.errors,
    )
  }

  fn finish_reset(
    &self,
    kind: ResetKind,
    success: bool,
    message: String,
    items_removed: Vec<String>,
    errors: Vec<RemovalFailure>,
  ) -> ResetOutcome {
    let reload = match self.scheduler.schedule(self.reload_delay) {
      Ok(ticket) => Some(ticket),
      Err(e) => {
        event!(Level::ERROR, error = %e, "Reload could not be scheduled.");
        None
      }
    };
    let message = if reload.is_some() {
      format!("{} Reloading in {} ms.", message, self.reload_delay.as_millis())
    } else {
      format!("{} Reload could not be scheduled.", message)
    };
    ResetOutcome {
      report: ResetReport {
        kind,
        success,
        message,
        items_removed,
        errors,
        reload_scheduled: reload.is_some(),
        reload_delay_ms: self.reload_delay.as_millis() as u64,
      },
      reload,
    }
  }
}
