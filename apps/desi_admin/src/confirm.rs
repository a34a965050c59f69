// desi_admin/src/confirm.rs

use desi_store::{AdminAction, Confirmer};
use dialoguer::Confirm;

/// Asks on the terminal, defaulting to no. A prompt that cannot be shown declines.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
  fn confirm(&self, action: AdminAction, prompt: &str) -> bool {
    match Confirm::new()
      .with_prompt(format!("[{}] {}", action, prompt))
      .default(false)
      .interact()
    {
      Ok(answer) => answer,
      Err(e) => {
        tracing::warn!(error = %e, "Could not read confirmation; treating as declined.");
        false
      }
    }
  }
}
