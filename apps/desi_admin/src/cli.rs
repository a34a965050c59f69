// desi_admin/src/cli.rs

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "desi_admin", version, about = "Inspect and maintain a Desi Destinations client store")]
pub struct Cli {
  /// Store file to operate on. Overrides DESI_STORE_PATH.
  #[arg(long, global = true)]
  pub store: Option<PathBuf>,

  /// Answer yes to every confirmation prompt.
  #[arg(short, long, global = true)]
  pub yes: bool,

  /// Delay before the client reload after a reset. Overrides DESI_RELOAD_DELAY_MS.
  #[arg(long, global = true, value_name = "MS")]
  pub reload_delay_ms: Option<u64>,

  /// Only remove registered keys, ignoring user/auth/login/session lookalikes.
  #[arg(long, global = true)]
  pub no_heuristic: bool,

  /// Print reports as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Count accounts, history entries and notifications.
  Stats,
  /// Check that no application data remains.
  Verify,
  /// Remove every application-owned key.
  Purge,
  /// Clear the whole store, then reload the client.
  ForceReset,
  /// Purge application data, then reload the client.
  ResetReload,
  /// Resolve the screen a launch with this query string lands on.
  Open {
    #[arg(long, default_value = "")]
    query: String,
  },
  Register(RegisterArgs),
  Login {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
  },
  Logout,
  /// Show the logged-in account.
  Whoami,
  /// Record a completed trip search.
  Search(SearchArgs),
  History,
  Notifications,
  /// Mark a notification, or all of them, as read.
  Ack {
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    id: Option<String>,
    #[arg(long)]
    all: bool,
  },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
  #[arg(long)]
  pub name: String,
  #[arg(long)]
  pub email: String,
  #[arg(long)]
  pub password: String,
  #[arg(long)]
  pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
  #[arg(long)]
  pub from: String,
  #[arg(long)]
  pub to: String,
  /// YYYY-MM-DD
  #[arg(long)]
  pub start: NaiveDate,
  /// YYYY-MM-DD
  #[arg(long)]
  pub end: NaiveDate,
  /// `Place:Activity`, repeatable.
  #[arg(long = "activity", value_name = "PLACE:ACTIVITY")]
  pub activities: Vec<String>,
}
