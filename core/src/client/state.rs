// desi_store/src/client/state.rs

use crate::client::shared::Shared;
use crate::error::{StoreError, StoreResult};
use crate::maintenance::ReloadHook;
use crate::models::{Notification, SearchRecord, UserAccount};
use crate::records::{AccountRepo, HistoryRepo, NotificationRepo};
use crate::store::SharedStore;
use async_trait::async_trait;
use tracing::{event, instrument, Level};

/// What the UI holds in memory between store reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
  pub session_email: Option<String>,
  /// `None` when logged out or when the session points at a missing account.
  pub account: Option<UserAccount>,
  pub history: Vec<SearchRecord>,
  pub notifications: Vec<Notification>,
  pub reload_count: u64,
}

impl ClientState {
  #[instrument(name = "ClientState::hydrate", skip_all, err(Display))]
  pub fn hydrate(store: &SharedStore) -> StoreResult<Self> {
    let accounts = AccountRepo::new(store.clone());
    let session_email = accounts.session_email()?;
    let account = match accounts.current() {
      Ok(account) => account,
      Err(StoreError::Malformed { key, source }) => {
        event!(Level::WARN, %key, error = %source, "Account record is malformed; treating session as logged out.");
        None
      }
      Err(other) => return Err(other),
    };

    Ok(Self {
      session_email,
      account,
      history: HistoryRepo::new(store.clone()).list()?,
      notifications: NotificationRepo::new(store.clone()).list()?,
      reload_count: 0,
    })
  }

  pub fn is_logged_in(&self) -> bool {
    self.account.is_some()
  }

  pub fn unread_notifications(&self) -> usize {
    self.notifications.iter().filter(|n| !n.is_read()).count()
  }
}

/// Reload hook that rebuilds the shared client state from the store.
pub struct RehydrateOnReload {
  store: SharedStore,
  state: Shared<ClientState>,
}

impl RehydrateOnReload {
  pub fn new(store: SharedStore, state: Shared<ClientState>) -> Self {
    Self { store, state }
  }
}

#[async_trait]
impl ReloadHook for RehydrateOnReload {
  async fn reload(&self) -> StoreResult<()> {
    let mut fresh = ClientState::hydrate(&self.store)?;
    let mut guard = self.state.write();
    fresh.reload_count = guard.reload_count + 1;
    *guard = fresh;
    event!(Level::INFO, reloads = guard.reload_count, logged_in = guard.is_logged_in(), "Client state re-hydrated.");
    Ok(())
  }
}
