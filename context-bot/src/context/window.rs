//! Context window selection around a target message.

use storage::{MessageRecord, MessageRepository, StorageError};
use tracing::debug;

use super::root::resolve_root;

/// Selects the bounded ascending window of candidate messages around the
/// target.
///
/// A reply belongs to its thread: the root is resolved starting from the
/// reply parent and the window runs forward from it. A non-reply looks
/// backward for conversational lead-in, target included, ascending. An
/// unknown target yields an empty window; otherwise the window always
/// contains the target and holds at most `window_size` messages.
pub async fn select_window(
    repo: &MessageRepository,
    chat_id: i64,
    target_id: i64,
    window_size: i64,
) -> Result<Vec<MessageRecord>, StorageError> {
    let Some(target) = repo.get(chat_id, target_id).await? else {
        return Ok(Vec::new());
    };

    let mut window = match target.reply_to_message_id {
        Some(parent_id) => {
            let root_id = resolve_root(repo, chat_id, parent_id).await?;
            debug!(chat_id, target_id, root_id, "Resolved reply-chain root");
            repo.from_onward(chat_id, root_id, window_size).await?
        }
        None => repo.before_or_at(chat_id, target_id, window_size).await?,
    };

    // A thread longer than the window pushes the target off its end; every
    // later id in the window is smaller than the target's, so swapping the
    // last row for the target keeps the order and the size bound.
    if !window.iter().any(|m| m.message_id == target_id) {
        window.pop();
        window.push(target);
    }

    Ok(window)
}
