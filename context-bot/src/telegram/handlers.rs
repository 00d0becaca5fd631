//! Event handlers: message recording and the reaction trigger.

use std::sync::Arc;

use storage::MessageRecord;
use teloxide::types::{Message, MessageReactionUpdated, ReactionType};
use tracing::{debug, error, info, instrument};

use crate::context::PipelineOutcome;

use super::runner::AppContext;

/// Records every text message from the source chat; everything else is
/// ignored. Already-stored ids are skipped early (the store would ignore the
/// duplicate anyway).
#[instrument(skip(msg, ctx), fields(chat_id = msg.chat.id.0, message_id = msg.id.0))]
pub async fn on_message(msg: Message, ctx: Arc<AppContext>) {
    if msg.chat.id.0 != ctx.config.source_chat_id {
        return;
    }
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message");
        return;
    };

    let chat_id = msg.chat.id.0;
    let message_id = i64::from(msg.id.0);

    match ctx.repo.exists(chat_id, message_id).await {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Failed to check message existence");
            return;
        }
    }

    let record = MessageRecord {
        chat_id,
        message_id,
        user_id: msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0),
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
        text: text.to_string(),
        reply_to_message_id: msg.reply_to_message().map(|m| i64::from(m.id.0)),
        created_at: msg.date,
    };

    if let Err(e) = ctx.repo.save(&record).await {
        error!(error = %e, "Failed to save message");
        return;
    }

    info!(
        username = record.username.as_deref().unwrap_or("unknown"),
        "Recorded message"
    );
}

/// Triggers one pipeline run when the configured reaction lands on a source
/// chat message. Repeated qualifying reactions re-run and re-publish.
#[instrument(skip(event, ctx), fields(chat_id = event.chat.id.0, message_id = event.message_id.0))]
pub async fn on_reaction(event: MessageReactionUpdated, ctx: Arc<AppContext>) {
    if event.chat.id.0 != ctx.config.source_chat_id {
        return;
    }
    if !has_trigger_reaction(&event.new_reaction, &ctx.config.trigger_emoji) {
        return;
    }

    let chat_id = event.chat.id.0;
    let message_id = i64::from(event.message_id.0);
    info!("Trigger reaction detected");

    // Run in a spawned task so the dispatch loop keeps draining updates.
    tokio::spawn(async move {
        match ctx.pipeline.run(chat_id, message_id).await {
            Ok(PipelineOutcome::Published { message_ids, chunks }) => {
                info!(
                    chat_id,
                    message_id,
                    published = message_ids.len(),
                    chunks,
                    "Pipeline run published excerpt"
                );
            }
            Ok(outcome) => {
                info!(chat_id, message_id, ?outcome, "Pipeline run aborted");
            }
            Err(e) => {
                error!(chat_id, message_id, error = %e, "Pipeline run failed");
            }
        }
    });
}

/// True when the newly-added reactions contain the trigger emoji.
fn has_trigger_reaction(new_reactions: &[ReactionType], trigger: &str) -> bool {
    new_reactions
        .iter()
        .any(|reaction| matches!(reaction, ReactionType::Emoji { emoji } if emoji == trigger))
}
