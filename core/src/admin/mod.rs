// desi_store/src/admin/mod.rs

//! The administrative trigger surface.
//!
//! Destructive actions run only after the injected [`Confirmer`] accepts.

pub mod entry;

pub use entry::{EmergencyResetPolicy, EntryRoute};

use crate::maintenance::{DataCleanup, PurgeReport, ResetOutcome, StoreStats, VerifyReport};
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
  Stats,
  VerifyEmpty,
  PurgeAll,
  ForceReset,
  ResetAndReload,
}

impl AdminAction {
  pub fn is_destructive(self) -> bool {
    matches!(self, AdminAction::PurgeAll | AdminAction::ForceReset | AdminAction::ResetAndReload)
  }

  /// Question shown before a destructive action.
  pub fn confirmation_prompt(self) -> &'static str {
    match self {
      AdminAction::PurgeAll => {
        "Delete all Desi Destinations accounts, the active session, search history and notifications?"
      }
      AdminAction::ForceReset => "Erase EVERY key in this store, including data from other applications, and reload?",
      AdminAction::ResetAndReload => "Delete all Desi Destinations data and reload the client?",
      AdminAction::Stats | AdminAction::VerifyEmpty => "Run this read-only check?",
    }
  }
}

impl fmt::Display for AdminAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      AdminAction::Stats => "stats",
      AdminAction::VerifyEmpty => "verify-empty",
      AdminAction::PurgeAll => "purge-all",
      AdminAction::ForceReset => "force-reset",
      AdminAction::ResetAndReload => "reset-and-reload",
    };
    f.write_str(name)
  }
}

/// Asks the operator to approve a destructive action.
pub trait Confirmer: Send + Sync {
  fn confirm(&self, action: AdminAction, prompt: &str) -> bool;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
  fn confirm(&self, _action: AdminAction, _prompt: &str) -> bool {
    self.0
  }
}

#[derive(Debug)]
pub enum AdminOutcome {
  Stats(StoreStats),
  Verify(VerifyReport),
  Purge(PurgeReport),
  Reset(ResetOutcome),
  Cancelled(AdminAction),
}

pub struct AdminPanel {
  cleanup: Arc<DataCleanup>,
  confirmer: Arc<dyn Confirmer>,
}

impl AdminPanel {
  pub fn new(cleanup: Arc<DataCleanup>, confirmer: Arc<dyn Confirmer>) -> Self {
    Self { cleanup, confirmer }
  }

  pub fn cleanup(&self) -> &DataCleanup {
    &self.cleanup
  }

  #[instrument(name = "AdminPanel::execute", skip_all, fields(action = %action))]
  pub fn execute(&self, action: AdminAction) -> AdminOutcome {
    if action.is_destructive() && !self.confirmer.confirm(action, action.confirmation_prompt()) {
      event!(Level::INFO, "Destructive action declined by operator.");
      return AdminOutcome::Cancelled(action);
    }
    event!(Level::INFO, "Running admin action.");
    match action {
      AdminAction::Stats => AdminOutcome::Stats(self.cleanup.stats()),
      AdminAction::VerifyEmpty => AdminOutcome::Verify(self.cleanup.verify_empty()),
      AdminAction::PurgeAll => AdminOutcome::Purge(self.cleanup.purge_all()),
      AdminAction::ForceReset => AdminOutcome::Reset(self.cleanup.force_reset()),
      AdminAction::ResetAndReload => AdminOutcome::Reset(self.cleanup.reset_and_reload()),
    }
  }
}
