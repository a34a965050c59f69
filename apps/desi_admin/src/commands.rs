// desi_admin/src/commands.rs

use crate::cli::{Cli, Command, RegisterArgs, SearchArgs};
use crate::config::AdminConfig;
use crate::confirm::TerminalConfirmer;
use crate::errors::{AppError, Result};
use desi_store::{
  AccountRepo, AdminAction, AdminOutcome, AdminPanel, ClientState, Confirmer, DataCleanup, EntryRoute, FileStore,
  FixedAnswer, HistoryRepo, NotificationRepo, Registration, RehydrateOnReload, ReloadScheduler, ResetOutcome,
  SearchRequest, SearchService, Shared, SharedStore,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Everything a command needs, opened once per invocation.
pub struct Workbench {
  config: AdminConfig,
  store: SharedStore,
  state: Shared<ClientState>,
  panel: AdminPanel,
  json: bool,
}

impl Workbench {
  pub fn open(config: AdminConfig, cli: &Cli) -> Result<Self> {
    Self::with_confirmer(config, confirmer_for(cli.yes), cli.json)
  }

  /// Opens the store and wires the reload hook to the hydrated client state.
  pub fn with_confirmer(config: AdminConfig, confirmer: Arc<dyn Confirmer>, json: bool) -> Result<Self> {
    let store: SharedStore = Arc::new(FileStore::open(&config.store_path)?);
    let state = Shared::new(ClientState::hydrate(&store)?);
    // The hook shares `state`, so a reload is visible to this workbench once the ticket resolves.
    let hook = Arc::new(RehydrateOnReload::new(store.clone(), state.clone()));
    let cleanup = DataCleanup::new(store.clone(), ReloadScheduler::new(hook), config.cleanup_config());
    Ok(Self {
      config,
      store,
      state,
      panel: AdminPanel::new(Arc::new(cleanup), confirmer),
      json,
    })
  }

  #[instrument(name = "Workbench::run", skip_all, err(Display))]
  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Stats => self.admin(AdminAction::Stats).await,
      Command::Verify => self.admin(AdminAction::VerifyEmpty).await,
      Command::Purge => self.admin(AdminAction::PurgeAll).await,
      Command::ForceReset => self.admin(AdminAction::ForceReset).await,
      Command::ResetReload => self.admin(AdminAction::ResetAndReload).await,
      Command::Open { query } => self.open_route(&query).await,
      Command::Register(args) => self.register(args),
      Command::Login { email, password } => {
        let account = AccountRepo::new(self.store.clone()).login(&email, &password)?;
        println!("Logged in as {} <{}>.", account.name, account.email);
        Ok(())
      }
      Command::Logout => {
        AccountRepo::new(self.store.clone()).logout()?;
        println!("Logged out.");
        Ok(())
      }
      Command::Whoami => self.whoami(),
      Command::Search(args) => self.search(args),
      Command::History => {
        let history = HistoryRepo::new(self.store.clone()).list()?;
        if self.json {
          return print_json(&history);
        }
        if history.is_empty() {
          println!("No searches yet.");
        }
        for (i, record) in history.iter().enumerate() {
          println!(
            "{:>2}. {} -> {}  {} to {}  [{:?}]",
            i + 1,
            record.source,
            record.destination,
            record.start_date,
            record.end_date,
            record.status
          );
        }
        Ok(())
      }
      Command::Notifications => {
        let notifications = NotificationRepo::new(self.store.clone()).list()?;
        if self.json {
          return print_json(&notifications);
        }
        if notifications.is_empty() {
          println!("No notifications.");
        }
        for n in &notifications {
          let marker = if n.is_read() { " " } else { "*" };
          println!("{} {}  {:?}  {}  ({})", marker, n.id, n.kind, n.message, n.timestamp.format("%Y-%m-%d %H:%M"));
        }
        Ok(())
      }
      Command::Ack { id, all } => {
        let repo = NotificationRepo::new(self.store.clone());
        if all {
          println!("Marked {} notification(s) as read.", repo.mark_all_read()?);
          return Ok(());
        }
        let id = id.ok_or_else(|| AppError::Validation("A notification id or --all is required.".to_string()))?;
        if repo.mark_read(&id)? {
          println!("Notification {} marked as read.", id);
          Ok(())
        } else {
          Err(AppError::Validation(format!("No notification with id '{}'.", id)))
        }
      }
    }
  }

  async fn admin(&self, action: AdminAction) -> Result<()> {
    match self.panel.execute(action) {
      AdminOutcome::Stats(stats) => {
        if self.json {
          return print_json(&stats);
        }
        println!("User accounts:          {}", stats.user_accounts);
        println!("Search history entries: {}", stats.search_history_entries);
        println!("Notifications:          {}", stats.notification_entries);
        println!("Application keys:       {}", stats.total_data_items);
        println!("All keys in store:      {}", stats.all_keys.len());
        for key in &stats.app_keys {
          println!("  - {}", key);
        }
        Ok(())
      }
      AdminOutcome::Verify(report) => {
        if self.json {
          return print_json(&report);
        }
        if report.is_clean {
          println!("Store is clean: no application data remains.");
        } else {
          println!("{} application key(s) remain:", report.remaining_keys.len());
          for key in &report.remaining_keys {
            println!("  - {}", key);
          }
        }
        Ok(())
      }
      AdminOutcome::Purge(report) => {
        if self.json {
          return print_json(&report);
        }
        println!("{}", report.message);
        for failure in &report.errors {
          println!("  ! {}: {}", failure.key, failure.reason);
        }
        Ok(())
      }
      AdminOutcome::Reset(outcome) => self.finish_reset(outcome).await,
      AdminOutcome::Cancelled(action) => {
        println!("Cancelled {}.", action);
        Ok(())
      }
    }
  }

  async fn finish_reset(&self, outcome: ResetOutcome) -> Result<()> {
    let ResetOutcome { report, reload } = outcome;
    if self.json {
      print_json(&report)?;
    } else {
      println!("{}", report.message);
      for failure in &report.errors {
        println!("  ! {}: {}", failure.key, failure.reason);
      }
    }
    if let Some(ticket) = reload {
      ticket.wait().await?;
      let state = self.state.read();
      event!(Level::INFO, reloads = state.reload_count, "Client reloaded.");
      if !self.json {
        println!(
          "Client reloaded: {}.",
          if state.is_logged_in() { "session restored" } else { "logged out" }
        );
      }
    }
    Ok(())
  }

  async fn open_route(&self, query: &str) -> Result<()> {
    let session_present = self.state.read().is_logged_in();
    let route = EntryRoute::resolve(query, session_present, self.config.entry_policy());
    println!("Route: {:?}", route);
    if route == EntryRoute::EmergencyReset {
      return self.admin(AdminAction::ResetAndReload).await;
    }
    Ok(())
  }

  fn register(&self, args: RegisterArgs) -> Result<()> {
    let account = AccountRepo::new(self.store.clone()).register(Registration {
      name: args.name,
      email: args.email,
      password: args.password,
      phone: args.phone,
    })?;
    println!("Registered and logged in as {} <{}>.", account.name, account.email);
    Ok(())
  }

  fn whoami(&self) -> Result<()> {
    let state = self.state.read();
    match &state.account {
      Some(account) => {
        println!("{} <{}>", account.name, account.email);
        if let Some(phone) = &account.phone {
          println!("Phone: {}", phone);
        }
        println!("Member since {}", account.created_at.format("%Y-%m-%d"));
        println!("Unread notifications: {}", state.unread_notifications());
      }
      None => println!("Not logged in."),
    }
    Ok(())
  }

  fn search(&self, args: SearchArgs) -> Result<()> {
    let request = SearchRequest {
      source: args.from,
      destination: args.to,
      start_date: args.start,
      end_date: args.end,
      activities: parse_activities(&args.activities)?,
    };
    let record = SearchService::new(self.store.clone()).complete(request)?;
    if self.json {
      return print_json(&record);
    }
    println!("Saved search {}: {} -> {}.", record.id, record.source, record.destination);
    Ok(())
  }
}

/// `--yes` answers every prompt; otherwise the operator is asked on the terminal.
pub fn confirmer_for(assume_yes: bool) -> Arc<dyn Confirmer> {
  if assume_yes {
    Arc::new(FixedAnswer(true))
  } else {
    Arc::new(TerminalConfirmer)
  }
}

/// Groups `Place:Activity` pairs by place.
pub fn parse_activities(raw: &[String]) -> Result<BTreeMap<String, Vec<String>>> {
  let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
  for entry in raw {
    let (place, activity) = entry
      .split_once(':')
      .map(|(p, a)| (p.trim(), a.trim()))
      .filter(|(p, a)| !p.is_empty() && !a.is_empty())
      .ok_or_else(|| AppError::Validation(format!("Activity '{}' must look like Place:Activity.", entry)))?;
    grouped.entry(place.to_string()).or_default().push(activity.to_string());
  }
  Ok(grouped)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
