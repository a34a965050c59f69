// desi_store/src/records/accounts.rs

//! Account registration, login and the session marker.

use crate::error::{StoreError, StoreResult};
use crate::keys::{account_key, SESSION_KEY};
use crate::models::UserAccount;
use crate::records::password;
use crate::store::{read_json, write_json, SharedStore};
use chrono::Utc;
use tracing::{event, info, instrument, warn, Level};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Input for [`AccountRepo::register`].
#[derive(Debug, Clone)]
pub struct Registration {
  pub name: String,
  pub email: String,
  pub password: String,
  pub phone: Option<String>,
}

/// Canonical form used for account keys and the session marker.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AccountRepo {
  store: SharedStore,
}

impl AccountRepo {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Creates the account and logs it in.
  #[instrument(name = "AccountRepo::register", skip_all, fields(email = %registration.email), err(Display))]
  pub fn register(&self, registration: Registration) -> StoreResult<UserAccount> {
    let email = normalize_email(&registration.email);
    let name = registration.name.trim().to_string();

    if name.is_empty() {
      return Err(StoreError::Validation("Name is required.".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
      return Err(StoreError::Validation("A valid email is required.".to_string()));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(StoreError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_LEN
      )));
    }
    if self.store.get(&account_key(&email))?.is_some() {
      warn!("Registration attempted with an existing email.");
      return Err(StoreError::DuplicateAccount { email });
    }

    let account = UserAccount {
      name,
      email: email.clone(),
      password_hash: password::hash_password(&registration.password)?,
      phone: registration.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
      created_at: Utc::now(),
    };
    write_json(self.store.as_ref(), &account_key(&email), &account)?;
    self.store.set(SESSION_KEY, &email)?;
    info!("Account registered and session started.");
    Ok(account)
  }

  #[instrument(name = "AccountRepo::login", skip(self, password), err(Display))]
  pub fn login(&self, email: &str, password: &str) -> StoreResult<UserAccount> {
    let email = normalize_email(email);
    let account = self.find(&email)?.ok_or(StoreError::InvalidCredentials)?;
    if !password::verify_password(&account.password_hash, password)? {
      warn!("Login rejected: password mismatch.");
      return Err(StoreError::InvalidCredentials);
    }
    self.store.set(SESSION_KEY, &email)?;
    info!("Session started.");
    Ok(account)
  }

  /// Removes the session marker. Logging out twice is harmless.
  pub fn logout(&self) -> StoreResult<()> {
    self.store.remove(SESSION_KEY)?;
    event!(Level::INFO, "Session cleared.");
    Ok(())
  }

  pub fn find(&self, email: &str) -> StoreResult<Option<UserAccount>> {
    read_json(self.store.as_ref(), &account_key(&normalize_email(email)))
  }

  pub fn session_email(&self) -> StoreResult<Option<String>> {
    Ok(self.store.get(SESSION_KEY)?.filter(|e| !e.trim().is_empty()))
  }

  /// The logged-in account. A session pointing at a missing account reads as logged out.
  pub fn current(&self) -> StoreResult<Option<UserAccount>> {
    let Some(email) = self.session_email()? else {
      return Ok(None);
    };
    let account = self.find(&email)?;
    if account.is_none() {
      warn!(%email, "Session marker refers to a missing account.");
    }
    Ok(account)
  }
}
