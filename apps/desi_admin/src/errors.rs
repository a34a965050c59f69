// desi_admin/src/errors.rs

use desi_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {source}")]
  Store {
    #[from]
    source: StoreError,
  },

  #[error("Output Encoding Error: {0}")]
  Encode(#[from] serde_json::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
