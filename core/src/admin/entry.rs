// desi_store/src/admin/entry.rs

//! Resolves the screen a visitor lands on from the launch query string.
//!
//! `reset=true` asks for the emergency reset screen without logging in.
//! Since that lets any visitor wipe every account, it is honoured only when
//! the policy explicitly allows it; the reset screen itself still goes
//! through the confirmation gate.

use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRoute {
  Login,
  Home,
  EmergencyReset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmergencyResetPolicy {
  pub allow_unauthenticated: bool,
}

impl EntryRoute {
  /// `query` may include the leading `?`.
  pub fn resolve(query: &str, session_present: bool, policy: EmergencyResetPolicy) -> Self {
    let normal = if session_present { EntryRoute::Home } else { EntryRoute::Login };
    if !requests_reset(query) {
      return normal;
    }
    if policy.allow_unauthenticated {
      event!(Level::WARN, "Emergency reset route opened without authentication.");
      EntryRoute::EmergencyReset
    } else {
      event!(Level::WARN, route = ?normal, "Emergency reset requested but disabled by policy.");
      normal
    }
  }
}

fn requests_reset(query: &str) -> bool {
  query
    .trim_start_matches('?')
    .split('&')
    .filter_map(|pair| pair.split_once('='))
    .any(|(name, value)| name == "reset" && value.eq_ignore_ascii_case("true"))
}
