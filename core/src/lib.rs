// desi_store/src/lib.rs

//! desi_store: the client-side data layer of the Desi Destinations travel planner.
//!
//! All application state lives in a per-profile key/value store. This crate provides:
//!  - The [`KeyValueStore`] seam with in-memory and file-backed implementations.
//!  - Typed repositories for accounts, the session marker, search history and notifications.
//!  - [`DataCleanup`], the maintenance utility: purge, stats, verify-empty and resets
//!    followed by a delayed client reload.
//!  - [`AdminPanel`], which gates destructive maintenance behind an operator confirmation.
//!
//! Persisted layout:
//!
//! ```text
//! desiDestinations_user_<email>  -> account JSON object
//! desiDestinationsEmail          -> email of the logged-in account
//! searchHistory                  -> JSON array, newest first, at most 10
//! notifications                  -> JSON array, newest first
//! ```

pub mod admin;
pub mod client;
pub mod error;
pub mod keys;
pub mod maintenance;
pub mod models;
pub mod records;
pub mod routine;
pub mod store;

pub use crate::admin::{AdminAction, AdminOutcome, AdminPanel, Confirmer, EmergencyResetPolicy, EntryRoute, FixedAnswer};
pub use crate::client::{ClientState, RehydrateOnReload, Shared};
pub use crate::error::{StoreError, StoreResult};
pub use crate::keys::{KeyClass, KeyPartition, KeyRegistry};
pub use crate::maintenance::{
  CleanupConfig, DataCleanup, PurgeReport, ReloadHook, ReloadScheduler, ReloadTicket, RemovalFailure, ResetKind,
  ResetOutcome, ResetReport, StoreStats, VerifyReport,
};
pub use crate::models::{Notification, NotificationKind, SearchRecord, SearchStatus, UserAccount};
pub use crate::records::{AccountRepo, HistoryRepo, NotificationRepo, Registration, SearchRequest, SearchService};
pub use crate::store::{FileStore, KeyValueStore, MemoryStore, SharedStore};
