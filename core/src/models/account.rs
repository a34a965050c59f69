// desi_store/src/models/account.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
  pub name: String,
  pub email: String,
  /// Argon2 PHC string; the plain password is never stored.
  pub password_hash: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}
