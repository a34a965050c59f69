// desi_store/examples/admin_reset.rs

use desi_store::{
  AccountRepo, AdminAction, AdminOutcome, AdminPanel, CleanupConfig, ClientState, DataCleanup, FixedAnswer,
  MemoryStore, NotificationKind, NotificationRepo, Registration, RehydrateOnReload, ReloadScheduler, Shared,
  SharedStore, StoreError,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), StoreError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let store: SharedStore = Arc::new(MemoryStore::new());
  AccountRepo::new(store.clone()).register(Registration {
    name: "Asha".to_string(),
    email: "asha@example.com".to_string(),
    password: "namaste123".to_string(),
    phone: None,
  })?;
  NotificationRepo::new(store.clone()).push("Welcome to Desi Destinations!", NotificationKind::Info)?;

  let state = Shared::new(ClientState::hydrate(&store)?);
  let scheduler = ReloadScheduler::new(Arc::new(RehydrateOnReload::new(store.clone(), state.clone())));
  let cleanup = DataCleanup::new(
    store.clone(),
    scheduler,
    CleanupConfig {
      reload_delay: Duration::from_millis(200),
      ..CleanupConfig::default()
    },
  );
  let panel = AdminPanel::new(Arc::new(cleanup), Arc::new(FixedAnswer(true)));

  if let AdminOutcome::Stats(stats) = panel.execute(AdminAction::Stats) {
    info!(accounts = stats.user_accounts, items = stats.total_data_items, "Before reset");
  }

  if let AdminOutcome::Reset(outcome) = panel.execute(AdminAction::ResetAndReload) {
    info!(message = %outcome.report.message, "Reset finished");
    if let Some(ticket) = outcome.reload {
      ticket.wait().await?;
    }
  }

  let guard = state.read();
  info!(logged_in = guard.is_logged_in(), reloads = guard.reload_count, "After reload");
  Ok(())
}
