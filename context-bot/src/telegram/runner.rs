//! Dispatcher wiring: one branch records messages, one watches reactions.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::MessageReactionUpdated;
use tracing::info;

use storage::MessageRepository;

use crate::config::BotConfig;
use crate::context::ContextPipeline;

use super::handlers::{on_message, on_reaction};

/// Shared state handed to every handler invocation.
pub struct AppContext {
    pub config: BotConfig,
    pub repo: MessageRepository,
    pub pipeline: ContextPipeline,
}

/// Runs the long-lived dispatch loop until the process is stopped.
///
/// The handler tree has two branches: new messages are persisted, reaction
/// updates may trigger a pipeline run. Handler failures are logged inside the
/// handlers and never escape to the loop.
pub async fn run_dispatcher(bot: teloxide::Bot, ctx: Arc<AppContext>) {
    info!(
        source_chat_id = ctx.config.source_chat_id,
        target_channel_id = ctx.config.target_channel_id,
        "Starting dispatcher"
    );

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(
            |msg: Message, ctx: Arc<AppContext>| async move {
                on_message(msg, ctx).await;
                respond(())
            },
        ))
        .branch(Update::filter_message_reaction_updated().endpoint(
            |event: MessageReactionUpdated, ctx: Arc<AppContext>| async move {
                on_reaction(event, ctx).await;
                respond(())
            },
        ));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
