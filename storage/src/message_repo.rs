//! Message repository: persistence and id-window queries for chat messages.
//!
//! Uses SqlitePoolManager and MessageRecord. The table is keyed by
//! `(chat_id, message_id)` and ingestion is idempotent: saving an already
//! stored key is a silent no-op and the first-seen content wins.

use crate::error::StorageError;
use crate::models::MessageRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::{debug, info};

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

/// Row count and id bounds for the store; logged at startup.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_messages: i64,
    pub first_message_id: Option<i64>,
    pub last_message_id: Option<i64>,
}

impl MessageRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                chat_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT,
                text TEXT NOT NULL,
                reply_to_message_id INTEGER,
                created_at TEXT NOT NULL,
                PRIMARY KEY (chat_id, message_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Inserts the record. Saving an already stored `(chat_id, message_id)`
    /// is a silent no-op; the first-seen content is kept.
    pub async fn save(&self, message: &MessageRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO messages
                (chat_id, message_id, user_id, username, text, reply_to_message_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.chat_id)
        .bind(message.message_id)
        .bind(message.user_id)
        .bind(&message.username)
        .bind(&message.text)
        .bind(message.reply_to_message_id)
        .bind(message.created_at)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(
                chat_id = message.chat_id,
                message_id = message.message_id,
                "Duplicate message ignored"
            );
        } else {
            info!(
                chat_id = message.chat_id,
                message_id = message.message_id,
                "Saved message"
            );
        }

        Ok(())
    }

    /// Whether a message with this key is already stored.
    pub async fn exists(&self, chat_id: i64, message_id: i64) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM messages WHERE chat_id = ? AND message_id = ?")
                .bind(chat_id)
                .bind(message_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.is_some())
    }

    pub async fn get(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<Option<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let message = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE chat_id = ? AND message_id = ?",
        )
        .bind(chat_id)
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// All messages with `from_id <= message_id <= to_id`, ascending.
    pub async fn range(
        &self,
        chat_id: i64,
        from_id: i64,
        to_id: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE chat_id = ? AND message_id >= ? AND message_id <= ?
            ORDER BY message_id ASC
            "#,
        )
        .bind(chat_id)
        .bind(from_id)
        .bind(to_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// The `limit` most recent messages with `message_id <= message_id`,
    /// returned in ascending order (fetched descending, reversed here).
    pub async fn before_or_at(
        &self,
        chat_id: i64,
        message_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let mut messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE chat_id = ? AND message_id <= ?
            ORDER BY message_id DESC
            LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(message_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        messages.reverse();
        Ok(messages)
    }

    /// The first `limit` messages with `message_id >= message_id`, ascending.
    pub async fn from_onward(
        &self,
        chat_id: i64,
        message_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE chat_id = ? AND message_id >= ?
            ORDER BY message_id ASC
            LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(message_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    pub async fn stats(&self) -> Result<StoreStats, StorageError> {
        let pool = self.pool_manager.pool();

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(pool)
            .await?;

        let bounds: (Option<i64>, Option<i64>) =
            sqlx::query_as("SELECT MIN(message_id), MAX(message_id) FROM messages")
                .fetch_one(pool)
                .await?;

        Ok(StoreStats {
            total_messages: total.0,
            first_message_id: bounds.0,
            last_message_id: bounds.1,
        })
    }
}
