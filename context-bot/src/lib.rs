//! # Context extraction bot
//!
//! Records every text message of one source chat and, when a message there
//! receives the trigger reaction, rebuilds the conversational thread around
//! it, filters the thread to the on-topic subset with a relevance classifier,
//! and republishes the excerpt to a destination channel.

pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod publisher;
pub mod render;
pub mod telegram;

pub use components::build_classifier;
pub use config::{BotConfig, ClassifierBackend};
pub use context::{resolve_root, select_window, ContextPipeline, PipelineOutcome, MAX_REPLY_DEPTH};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use publisher::{ChannelPublisher, TelegramPublisher};
pub use render::{chunk_text, into_chunks, render_messages, HARD_MESSAGE_LIMIT, SOFT_MESSAGE_LIMIT};
pub use telegram::{run_dispatcher, AppContext};
