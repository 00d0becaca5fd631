//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded chat message, keyed by `(chat_id, message_id)`.
///
/// Records are immutable once stored; saving the same key again is a no-op.
/// Messages without text are never stored, so `text` is not optional.
/// `reply_to_message_id` may reference a message that predates recording and
/// is absent from the store; callers treat it defensively.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub chat_id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub text: String,
    pub reply_to_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
