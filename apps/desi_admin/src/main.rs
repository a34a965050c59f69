// desi_admin/src/main.rs

mod cli;
mod commands;
mod config;
mod confirm;
mod errors;

use crate::cli::Cli;
use crate::commands::Workbench;
use crate::config::AdminConfig;
use crate::errors::Result as AppResult;

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed.");
      eprintln!("error: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> AppResult<()> {
  let mut config = AdminConfig::from_env()?;
  if let Some(path) = &cli.store {
    config.store_path = path.clone();
  }
  if let Some(ms) = cli.reload_delay_ms {
    config.reload_delay = Duration::from_millis(ms);
  }
  if cli.no_heuristic {
    config.key_heuristic = false;
  }

  tracing::info!(store = %config.store_path.display(), "Opening store.");
  let workbench = Workbench::open(config, &cli)?;
  workbench.run(cli.command).await
}
