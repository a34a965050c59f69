// desi_store/src/maintenance/reload.rs

//! Delayed client reload after a destructive reset.
//!
//! The delay only exists so a status message can be shown first. Once
//! scheduled a reload cannot be cancelled, and it is never retried.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{event, instrument, Level};

/// Re-initialises in-memory client state from the store.
#[async_trait]
pub trait ReloadHook: Send + Sync {
  async fn reload(&self) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct ReloadScheduler {
  hook: Arc<dyn ReloadHook>,
}

impl ReloadScheduler {
  pub fn new(hook: Arc<dyn ReloadHook>) -> Self {
    Self { hook }
  }

  /// Spawns the reload on the current tokio runtime.
  ///
  /// Fails with `ReloadUnavailable` when called outside a runtime.
  #[instrument(name = "ReloadScheduler::schedule", skip(self), err(Display))]
  pub fn schedule(&self, delay: Duration) -> StoreResult<ReloadTicket> {
    let runtime = Handle::try_current().map_err(|e| StoreError::ReloadUnavailable(e.to_string()))?;
    let hook = Arc::clone(&self.hook);
    let handle = runtime.spawn(async move {
      tokio::time::sleep(delay).await;
      event!(Level::INFO, "Reloading client state.");
      let result = hook.reload().await;
      if let Err(e) = &result {
        event!(Level::ERROR, error = %e, "Client reload failed.");
      }
      result
    });
    event!(Level::DEBUG, delay_ms = delay.as_millis() as u64, "Reload scheduled.");
    Ok(ReloadTicket { handle, delay })
  }
}

/// A scheduled reload. It can be awaited, not cancelled.
#[derive(Debug)]
pub struct ReloadTicket {
  handle: JoinHandle<StoreResult<()>>,
  delay: Duration,
}

impl ReloadTicket {
  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Waits for the reload to run and returns the hook's result.
  pub async fn wait(self) -> StoreResult<()> {
    self
      .handle
      .await
      .map_err(|join_err| StoreError::Internal(format!("reload task did not complete: {}", join_err)))?
  }
}
