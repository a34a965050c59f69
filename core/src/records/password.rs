// desi_store/src/records/password.rs

//! Argon2 hashing for account passwords.

use crate::error::StoreError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

/// Hashes `password` with a fresh random salt and default Argon2 parameters.
#[instrument(name = "password::hash", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, StoreError> {
  if password.is_empty() {
    return Err(StoreError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => {
      debug!("Password hashed.");
      Ok(hash.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 hashing failed.");
      Err(StoreError::PasswordHash(argon_err.to_string()))
    }
  }
}

/// Returns `Ok(false)` on mismatch; errors only for an unparsable stored hash.
#[instrument(name = "password::verify", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided: &str) -> Result<bool, StoreError> {
  let parsed = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Stored password hash is not a valid PHC string.");
    StoreError::PasswordHash(format!("invalid stored hash: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other) => {
      error!(error = %other, "Argon2 verification failed.");
      Err(StoreError::PasswordHash(other.to_string()))
    }
  }
}
