// desi_store/src/models/mod.rs

//! Record types persisted in the store. Field names are camelCase on the wire.

pub mod account;
pub mod history;
pub mod notification;

pub use account::UserAccount;
pub use history::{SearchRecord, SearchStatus};
pub use notification::{Notification, NotificationKind};
