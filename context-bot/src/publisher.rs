//! Outbound channel publishing.
//!
//! [`ChannelPublisher`] is the seam the pipeline emits through;
//! [`TelegramPublisher`] is the production implementation. Tests substitute a
//! recording fake.

use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::error::{BotError, Result};

/// Sends one text payload to the destination channel. Each call is one
/// ordered, externally observable emission; failures are not retried here.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Publishes to a fixed Telegram chat, optionally with Markdown formatting.
pub struct TelegramPublisher {
    bot: teloxide::Bot,
    channel_id: ChatId,
    parse_mode: Option<ParseMode>,
}

impl TelegramPublisher {
    pub fn new(bot: teloxide::Bot, channel_id: i64, markdown: bool) -> Self {
        Self {
            bot,
            channel_id: ChatId(channel_id),
            parse_mode: markdown.then_some(ParseMode::Markdown),
        }
    }
}

#[async_trait]
impl ChannelPublisher for TelegramPublisher {
    async fn send_text(&self, text: &str) -> Result<()> {
        let mut request = self.bot.send_message(self.channel_id, text.to_string());
        if let Some(mode) = self.parse_mode {
            request = request.parse_mode(mode);
        }
        request
            .await
            .map_err(|e| BotError::Publish(e.to_string()))?;
        Ok(())
    }
}
