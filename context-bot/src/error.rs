//! Error types for the bot application.

use thiserror::Error;

/// Top-level error for the bot (storage, outbound transport, config).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for bot operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
