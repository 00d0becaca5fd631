//! Reply-chain root resolution.

use storage::{MessageRepository, StorageError};
use tracing::warn;

/// Upper bound on reply-chain walks; protects against malformed or cyclic
/// parent links in stored data.
pub const MAX_REPLY_DEPTH: usize = 50;

/// Walks `reply_to_message_id` links from `start_id` and returns the earliest
/// resolvable ancestor.
///
/// The walk stops at a message with no parent (that id is the root), at an id
/// not present in the store (chains do not extend past unknown ancestors), or
/// at [`MAX_REPLY_DEPTH`], where the last-seen id is returned. Read-only.
pub async fn resolve_root(
    repo: &MessageRepository,
    chat_id: i64,
    start_id: i64,
) -> Result<i64, StorageError> {
    let mut current = start_id;

    for _ in 0..MAX_REPLY_DEPTH {
        match repo.get(chat_id, current).await? {
            Some(message) => match message.reply_to_message_id {
                Some(parent_id) => current = parent_id,
                None => return Ok(current),
            },
            None => return Ok(current),
        }
    }

    warn!(
        chat_id,
        start_id,
        last_seen = current,
        "Reply chain exceeded depth bound"
    );
    Ok(current)
}
