// desi_store/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Storage backend failed to {op} key '{key}'. Source: {source}")]
  Backend {
    op: &'static str,
    key: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Storage quota exceeded while writing key '{key}' ({needed} bytes needed, {quota} bytes allowed)")]
  QuotaExceeded { key: String, needed: usize, quota: usize },

  #[error("Storage is unavailable: {0}")]
  Unavailable(String),

  #[error("Malformed record under key '{key}'. Source: {source}")]
  Malformed {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to encode record for key '{key}'. Source: {source}")]
  Encode {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("An account already exists for {email}")]
  DuplicateAccount { email: String },

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Password hashing failed: {0}")]
  PasswordHash(String),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Reload could not be scheduled: {0}")]
  ReloadUnavailable(String),

  #[error("Internal store error: {0}")]
  Internal(String),
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
