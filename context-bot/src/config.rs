//! Bot configuration loaded from environment variables.
//!
//! Built once in `main` and passed into every component constructor; core
//! logic never reads the environment itself.

use anyhow::{bail, Context, Result};
use std::env;

/// Which relevance-classification backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// OpenAI or any OpenAI-compatible API (e.g. Groq via OPENAI_BASE_URL).
    OpenAi,
    /// Google Gemini generateContent API.
    Gemini,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// SOURCE_CHAT_ID: the only chat that is recorded and whose reactions trigger runs.
    pub source_chat_id: i64,
    /// TARGET_CHANNEL_ID: destination for published excerpts.
    pub target_channel_id: i64,
    /// DATABASE_URL
    pub database_url: String,
    /// CONTEXT_WINDOW_SIZE: max messages considered around a target.
    pub context_window_size: i64,
    /// TRIGGER_EMOJI: the reaction that starts a pipeline run.
    pub trigger_emoji: String,
    /// CLASSIFY_TIMEOUT_SECS: bound on one classification call.
    pub classify_timeout_secs: u64,
    /// PUBLISH_MARKDOWN: use Markdown parse mode when true, plain text otherwise.
    pub publish_markdown: bool,
    /// CLASSIFIER_BACKEND
    pub classifier_backend: ClassifierBackend,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_model: String,
    /// LOG_FILE
    pub log_file: String,
}

impl BotConfig {
    /// Load from environment variables. Call [`validate`](Self::validate) after.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN not set")?;
        let source_chat_id = env::var("SOURCE_CHAT_ID")
            .context("SOURCE_CHAT_ID not set")?
            .parse()
            .context("SOURCE_CHAT_ID is not a valid chat id")?;
        let target_channel_id = env::var("TARGET_CHANNEL_ID")
            .context("TARGET_CHANNEL_ID not set")?
            .parse()
            .context("TARGET_CHANNEL_ID is not a valid chat id")?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://context_bot.db".to_string());
        let context_window_size = env::var("CONTEXT_WINDOW_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);
        let trigger_emoji = env::var("TRIGGER_EMOJI").unwrap_or_else(|_| "👍".to_string());
        let classify_timeout_secs = env::var("CLASSIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let publish_markdown = env::var("PUBLISH_MARKDOWN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);
        let classifier_backend = match env::var("CLASSIFIER_BACKEND")
            .unwrap_or_else(|_| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => ClassifierBackend::OpenAi,
            "gemini" => ClassifierBackend::Gemini,
            other => bail!("Unknown CLASSIFIER_BACKEND: {}", other),
        };
        let openai_api_key = env::var("OPENAI_API_KEY").ok();
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let gemini_api_key = env::var("GEMINI_API_KEY").ok();
        let gemini_base_url = env::var("GEMINI_BASE_URL").ok();
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/context-bot.log".to_string());

        Ok(Self {
            bot_token,
            source_chat_id,
            target_channel_id,
            database_url,
            context_window_size,
            trigger_emoji,
            classify_timeout_secs,
            publish_markdown,
            classifier_backend,
            openai_api_key,
            openai_base_url,
            openai_model,
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            log_file,
        })
    }

    /// Validate config. Call after from_env() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        if self.context_window_size < 1 {
            bail!("CONTEXT_WINDOW_SIZE must be at least 1");
        }
        if self.trigger_emoji.is_empty() {
            bail!("TRIGGER_EMOJI must not be empty");
        }
        match self.classifier_backend {
            ClassifierBackend::OpenAi if self.openai_api_key.is_none() => {
                bail!("CLASSIFIER_BACKEND=openai requires OPENAI_API_KEY")
            }
            ClassifierBackend::Gemini if self.gemini_api_key.is_none() => {
                bail!("CLASSIFIER_BACKEND=gemini requires GEMINI_API_KEY")
            }
            _ => Ok(()),
        }
    }
}
