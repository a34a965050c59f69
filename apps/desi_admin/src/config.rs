// desi_admin/src/config.rs

use crate::errors::{AppError, Result};
use desi_store::maintenance::DEFAULT_RELOAD_DELAY;
use desi_store::{CleanupConfig, EmergencyResetPolicy};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "desi-destinations";
const STORE_FILE: &str = "storage.json";

#[derive(Debug, Clone)]
pub struct AdminConfig {
  pub store_path: PathBuf,
  pub reload_delay: Duration,
  pub allow_emergency_reset: bool,
  pub key_heuristic: bool,
}

impl AdminConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let store_path = get_env("DESI_STORE_PATH").map(PathBuf::from).unwrap_or_else(default_store_path);
    let reload_delay = match get_env("DESI_RELOAD_DELAY_MS") {
      Some(raw) => Duration::from_millis(
        raw
          .trim()
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid DESI_RELOAD_DELAY_MS: {}", e)))?,
      ),
      None => DEFAULT_RELOAD_DELAY,
    };
    let allow_emergency_reset = parse_flag(get_env("DESI_ALLOW_EMERGENCY_RESET"), "DESI_ALLOW_EMERGENCY_RESET", false)?;
    let key_heuristic = parse_flag(get_env("DESI_KEY_HEURISTIC"), "DESI_KEY_HEURISTIC", true)?;

    tracing::info!(store = %store_path.display(), "Admin configuration loaded.");

    Ok(Self {
      store_path,
      reload_delay,
      allow_emergency_reset,
      key_heuristic,
    })
  }

  pub fn cleanup_config(&self) -> CleanupConfig {
    CleanupConfig {
      reload_delay: self.reload_delay,
      key_heuristic: self.key_heuristic,
    }
  }

  pub fn entry_policy(&self) -> EmergencyResetPolicy {
    EmergencyResetPolicy {
      allow_unauthenticated: self.allow_emergency_reset,
    }
  }
}

fn parse_flag(raw: Option<String>, name: &str, default: bool) -> Result<bool> {
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .to_ascii_lowercase()
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid {} value: {}", name, e))),
  }
}

/// `<data dir>/desi-destinations/storage.json`, or relative to the working
/// directory when the platform has no data dir.
pub fn default_store_path() -> PathBuf {
  dirs::data_local_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_DIR)
    .join(STORE_FILE)
}
