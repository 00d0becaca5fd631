//! Rendering and length-bounded chunking of published excerpts.

use storage::MessageRecord;

/// Hard per-message length limit enforced by the destination channel.
pub const HARD_MESSAGE_LIMIT: usize = 4096;
/// Soft packing limit; leaves headroom below the hard bound for formatting.
pub const SOFT_MESSAGE_LIMIT: usize = 4000;

/// Renders messages as `*@username:* text` lines joined by newlines, in the
/// order given (callers pass ascending message_id order).
pub fn render_messages(messages: &[MessageRecord]) -> String {
    messages
        .iter()
        .map(|msg| {
            let author = msg
                .username
                .as_ref()
                .map(|u| format!("@{}", u))
                .unwrap_or_else(|| "Unknown".to_string());
            format!("*{}:* {}", author, msg.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits the full rendered text into ordered publishable chunks: one chunk
/// when it fits the hard limit, line-bounded chunks under the soft limit
/// otherwise.
pub fn into_chunks(text: &str) -> Vec<String> {
    if text.chars().count() <= HARD_MESSAGE_LIMIT {
        vec![text.to_string()]
    } else {
        chunk_text(text, SOFT_MESSAGE_LIMIT)
    }
}

/// Splits text into chunks of at most `soft_limit` chars, breaking at line
/// boundaries. No content is dropped and line order is preserved. A single
/// line longer than `soft_limit` cannot be packed whole, so it is split at
/// char boundaries; the hard limit is never exceeded either way.
pub fn chunk_text(text: &str, soft_limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        for piece in split_oversized_line(line, soft_limit) {
            let piece_len = piece.chars().count();

            if current_len > 0 && current_len + 1 + piece_len > soft_limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn split_oversized_line(line: &str, soft_limit: usize) -> Vec<String> {
    if line.chars().count() <= soft_limit {
        return vec![line.to_string()];
    }

    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(soft_limit)
        .map(|piece| piece.iter().collect())
        .collect()
}
