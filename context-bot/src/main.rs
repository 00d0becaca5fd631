//! Long-lived bot process: record the source chat, republish filtered context
//! excerpts on the trigger reaction. No CLI surface beyond start/stop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use context_bot::{
    build_classifier, init_tracing, run_dispatcher, AppContext, BotConfig, ContextPipeline,
    TelegramPublisher,
};
use storage::MessageRepository;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(database_url = %config.database_url, "Initializing store");
    let repo = MessageRepository::new(&config.database_url).await?;
    let stats = repo.stats().await?;
    info!(
        total_messages = stats.total_messages,
        last_message_id = ?stats.last_message_id,
        "Store ready"
    );

    let classifier = build_classifier(&config)?;
    info!(backend = classifier.name(), "Classifier ready");

    let bot = teloxide::Bot::new(config.bot_token.clone());
    let publisher = Arc::new(TelegramPublisher::new(
        bot.clone(),
        config.target_channel_id,
        config.publish_markdown,
    ));

    let pipeline = ContextPipeline::new(
        repo.clone(),
        classifier,
        publisher,
        config.context_window_size,
        Duration::from_secs(config.classify_timeout_secs),
    );

    let ctx = Arc::new(AppContext {
        config,
        repo,
        pipeline,
    });
    run_dispatcher(bot, ctx).await;

    Ok(())
}
