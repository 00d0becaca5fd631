//! # Relevance classification
//!
//! Defines the [`RelevanceClassifier`] capability and its interchangeable
//! backends. A backend receives the target message plus the ordered context
//! candidates and answers with the candidate ids that belong to the same
//! discussion. Backends differ in transport and model only; the request and
//! response shapes are fixed, and which backend runs is a configuration
//! concern of the caller.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

mod gemini;
mod openai;

pub use gemini::{GeminiClassifier, DEFAULT_GEMINI_BASE_URL};
pub use openai::OpenAiClassifier;

/// One message as presented to a classification backend.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub message_id: i64,
    pub username: Option<String>,
    pub text: String,
}

/// Errors from a classification backend.
///
/// All of these are recoverable: callers degrade to a target-only relevance
/// set and keep going.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Empty response from backend")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Capability: judge which candidates are about the same topic as the target.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    /// Backend name for logs and config errors.
    fn name(&self) -> &'static str;

    /// Returns the candidate ids judged relevant to `target`.
    ///
    /// Backends are not trusted to include the target id themselves; the
    /// caller unions it in.
    async fn classify(
        &self,
        target: &Candidate,
        candidates: &[Candidate],
    ) -> Result<Vec<i64>, ClassifyError>;
}

#[derive(Deserialize)]
struct RelevantIds {
    relevant_ids: Vec<i64>,
}

/// Renders the shared filtering prompt. The wording leans inclusive: when in
/// doubt a candidate stays; only clearly unrelated messages are dropped.
/// Candidates without text carry no signal and are left out of the material.
pub(crate) fn build_prompt(target: &Candidate, candidates: &[Candidate]) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .filter(|c| !c.text.trim().is_empty())
        .map(|c| {
            format!(
                "ID: {} | @{}: {}",
                c.message_id,
                c.username.as_deref().unwrap_or("unknown"),
                c.text
            )
        })
        .collect();

    format!(
        "You are analyzing a chat conversation to find messages relevant to a \
         specific target message.\n\n\
         Target message:\nID: {}\nText: \"{}\"\n\n\
         Surrounding messages in chronological order:\n{}\n\n\
         Identify which messages are part of the same discussion, topic or \
         conversation flow as the target. When in doubt, include the message; \
         only exclude messages that are clearly about a completely unrelated \
         topic. Always include the target message id itself.\n\n\
         Respond with a JSON object only, no markdown:\n\
         {{\"relevant_ids\": [123, 124, 125]}}",
        target.message_id,
        target.text,
        lines.join("\n")
    )
}

/// Parses a backend reply into the relevant id list.
///
/// Tolerates ```json fences around the object since not every model honors
/// "JSON only"; anything else non-conforming is malformed.
pub(crate) fn parse_relevant_ids(raw: &str) -> Result<Vec<i64>, ClassifyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClassifyError::EmptyResponse);
    }

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let parsed: RelevantIds =
        serde_json::from_str(body).map_err(|e| ClassifyError::Malformed(e.to_string()))?;
    Ok(parsed.relevant_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, username: Option<&str>, text: &str) -> Candidate {
        Candidate {
            message_id: id,
            username: username.map(|u| u.to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn prompt_contains_target_and_candidates() {
        let target = candidate(130, Some("alice"), "what about the deadline?");
        let candidates = vec![
            candidate(128, Some("bob"), "deadline is friday"),
            candidate(130, Some("alice"), "what about the deadline?"),
        ];

        let prompt = build_prompt(&target, &candidates);
        assert!(prompt.contains("ID: 130"));
        assert!(prompt.contains("@bob: deadline is friday"));
        assert!(prompt.contains("relevant_ids"));
    }

    #[test]
    fn prompt_skips_candidates_without_text() {
        let target = candidate(10, Some("alice"), "hello");
        let candidates = vec![
            candidate(8, Some("bob"), "   "),
            candidate(9, None, "actual content"),
        ];

        let prompt = build_prompt(&target, &candidates);
        assert!(!prompt.contains("ID: 8 |"));
        assert!(prompt.contains("ID: 9 | @unknown: actual content"));
    }

    #[test]
    fn parse_plain_json_object() {
        let ids = parse_relevant_ids("{\"relevant_ids\": [123, 124, 130]}")
            .expect("Failed to parse ids");
        assert_eq!(ids, vec![123, 124, 130]);
    }

    #[test]
    fn parse_fenced_json_object() {
        let raw = "```json\n{\"relevant_ids\": [45, 48, 50]}\n```";
        let ids = parse_relevant_ids(raw).expect("Failed to parse fenced ids");
        assert_eq!(ids, vec![45, 48, 50]);
    }

    #[test]
    fn parse_empty_response() {
        assert!(matches!(
            parse_relevant_ids("   "),
            Err(ClassifyError::EmptyResponse)
        ));
    }

    #[test]
    fn parse_malformed_response() {
        assert!(matches!(
            parse_relevant_ids("all of them look relevant to me"),
            Err(ClassifyError::Malformed(_))
        ));
    }
}
