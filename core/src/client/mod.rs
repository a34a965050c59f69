// desi_store/src/client/mod.rs

//! In-memory client state mirrored from the store.

pub mod shared;
pub mod state;

pub use shared::Shared;
pub use state::{ClientState, RehydrateOnReload};
