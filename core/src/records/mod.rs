// desi_store/src/records/mod.rs

//! Typed repositories over the four record families.

pub mod accounts;
pub mod history;
pub mod notifications;
pub mod password;
pub mod search;

pub use accounts::{normalize_email, AccountRepo, Registration};
pub use history::{HistoryRepo, HISTORY_CAP};
pub use notifications::NotificationRepo;
pub use search::{SearchRequest, SearchService};
