//! SQLite persistence for journal entries.
//!
//! Entries are stored as their JSON payload alongside a few indexed columns.
//! The store hands back `mm_core::Entry` values in insertion order, which is
//! the order the engine's tie-breaks are defined against.

pub mod error;
pub mod json_io;
pub mod paths;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use paths::{CONFIG_FILE, DB_FILE, default_data_dir};
pub use store::{EntryStore, Fingerprint};
