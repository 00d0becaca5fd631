//! Telegram event loop: message recording and the reaction trigger.

mod handlers;
mod runner;

pub use runner::{run_dispatcher, AppContext};
