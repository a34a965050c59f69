// desi_store/src/keys.rs

//! Key naming contract and ownership classification.
//!
//! The registry lists the keys the application knows it writes. The
//! substring scan (`user`, `auth`, `login`, `session`) only runs for keys the
//! registry does not recognise, and can be switched off.

/// Prefix of every account record: `desiDestinations_user_<email>`.
pub const ACCOUNT_KEY_PREFIX: &str = "desiDestinations_user_";
/// Holds the email of the logged-in account.
pub const SESSION_KEY: &str = "desiDestinationsEmail";
/// JSON array of searches, newest first.
pub const HISTORY_KEY: &str = "searchHistory";
/// JSON array of notifications, newest first.
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Lowercase substrings that mark an unregistered key as probably ours.
pub const HEURISTIC_MARKERS: [&str; 4] = ["user", "auth", "login", "session"];

/// Store key holding the account for `email`.
pub fn account_key(email: &str) -> String {
  format!("{}{}", ACCOUNT_KEY_PREFIX, email)
}

/// Ownership class of a single store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
  Account,
  Session,
  History,
  Notifications,
  /// Not registered, but the name looks application-owned.
  Heuristic,
  /// Written by someone else; only a force-reset touches it.
  Foreign,
}

impl KeyClass {
  pub fn is_owned(self) -> bool {
    !matches!(self, KeyClass::Foreign)
  }
}

/// Decides which store keys the application owns.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
  account_prefix: String,
  session_key: String,
  history_key: String,
  notifications_key: String,
  // Empty means the heuristic pass is off.
  heuristic_markers: Vec<String>,
}

impl Default for KeyRegistry {
  fn default() -> Self {
    Self::standard()
  }
}

impl KeyRegistry {
  /// The registry matching the persisted layout, heuristic pass enabled.
  pub fn standard() -> Self {
    Self {
      account_prefix: ACCOUNT_KEY_PREFIX.to_string(),
      session_key: SESSION_KEY.to_string(),
      history_key: HISTORY_KEY.to_string(),
      notifications_key: NOTIFICATIONS_KEY.to_string(),
      heuristic_markers: HEURISTIC_MARKERS.iter().map(|m| m.to_string()).collect(),
    }
  }

  /// Registered keys only; unknown keys are always foreign.
  pub fn without_heuristic(mut self) -> Self {
    self.heuristic_markers.clear();
    self
  }

  pub fn heuristic_enabled(&self) -> bool {
    !self.heuristic_markers.is_empty()
  }

  pub fn classify(&self, key: &str) -> KeyClass {
    // Registered keys are checked first; the heuristic only sees what they leave over.
    if key.starts_with(&self.account_prefix) {
      KeyClass::Account
    } else if key == self.session_key {
      KeyClass::Session
    } else if key == self.history_key {
      KeyClass::History
    } else if key == self.notifications_key {
      KeyClass::Notifications
    } else if self.matches_heuristic(key) {
      KeyClass::Heuristic
    } else {
      KeyClass::Foreign
    }
  }

  pub fn is_owned(&self, key: &str) -> bool {
    self.classify(key).is_owned()
  }

  fn matches_heuristic(&self, key: &str) -> bool {
    // Markers are stored lowercase, so only the key needs folding.
    let lowered = key.to_lowercase();
    self.heuristic_markers.iter().any(|m| lowered.contains(m.as_str()))
  }
}

/// A key list split by ownership class, each group in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPartition {
  pub accounts: Vec<String>,
  pub session: Vec<String>,
  pub history: Vec<String>,
  pub notifications: Vec<String>,
  pub heuristic: Vec<String>,
  pub foreign: Vec<String>,
}

impl KeyPartition {
  pub fn from_keys<'a>(registry: &KeyRegistry, keys: impl IntoIterator<Item = &'a String>) -> Self {
    let mut partition = KeyPartition::default();
    for key in keys {
      let bucket = match registry.classify(key) {
        KeyClass::Account => &mut partition.accounts,
        KeyClass::Session => &mut partition.session,
        KeyClass::History => &mut partition.history,
        KeyClass::Notifications => &mut partition.notifications,
        KeyClass::Heuristic => &mut partition.heuristic,
        KeyClass::Foreign => &mut partition.foreign,
      };
      // Each key lands in exactly one bucket, so `owned_len` never double counts.
      bucket.push(key.clone());
    }
    partition
  }

  /// Owned keys in removal order: accounts, session, history, notifications, heuristic.
  pub fn owned(&self) -> Vec<String> {
    self
      .accounts
      .iter()
      .chain(&self.session)
      .chain(&self.history)
      .chain(&self.notifications)
      .chain(&self.heuristic)
      .cloned()
      .collect()
  }

  pub fn owned_len(&self) -> usize {
    self.accounts.len() + self.session.len() + self.history.len() + self.notifications.len() + self.heuristic.len()
  }
}
