//! Context extraction: reply-chain root resolution, window selection,
//! relevance filtering and republication.

mod pipeline;
mod root;
mod window;

pub use pipeline::{ContextPipeline, PipelineOutcome};
pub use root::{resolve_root, MAX_REPLY_DEPTH};
pub use window::select_window;
