//! Storage crate: message persistence for the context bot.
//!
//! ## Modules
//!
//! - [`error`] – Storage error type
//! - [`models`] – MessageRecord
//! - [`message_repo`] – MessageRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod message_repo;
mod models;
mod sqlite_pool;

#[cfg(test)]
mod message_repo_test;

pub use error::StorageError;
pub use message_repo::{MessageRepository, StoreStats};
pub use models::MessageRecord;
pub use sqlite_pool::SqlitePoolManager;
