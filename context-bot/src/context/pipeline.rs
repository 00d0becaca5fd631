//! Pipeline orchestration: from a qualifying reaction to a published excerpt.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use classifier::{Candidate, RelevanceClassifier};
use storage::{MessageRecord, MessageRepository};
use tracing::{error, info, instrument, warn};

use crate::error::Result;
use crate::publisher::ChannelPublisher;
use crate::render::{into_chunks, render_messages};

use super::window::select_window;

/// What one pipeline run did. Aborted runs are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Excerpt published: the ascending ids that made it out and how many
    /// chunks were emitted.
    Published {
        message_ids: Vec<i64>,
        chunks: usize,
    },
    /// Target message was never recorded; nothing to extract context for.
    TargetMissing,
    /// Selector produced no candidates.
    EmptyContext,
    /// Nothing survived relevance projection.
    NoRelevantMessages,
}

/// Reaction-triggered context extraction: window selection, relevance
/// filtering, reassembly and publication.
pub struct ContextPipeline {
    repo: MessageRepository,
    classifier: Arc<dyn RelevanceClassifier>,
    publisher: Arc<dyn ChannelPublisher>,
    window_size: i64,
    classify_timeout: Duration,
}

impl ContextPipeline {
    pub fn new(
        repo: MessageRepository,
        classifier: Arc<dyn RelevanceClassifier>,
        publisher: Arc<dyn ChannelPublisher>,
        window_size: i64,
        classify_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            classifier,
            publisher,
            window_size,
            classify_timeout,
        }
    }

    /// Runs the pipeline once for the reacted `(chat_id, message_id)`.
    ///
    /// Classification failures degrade to a target-only excerpt and the run
    /// continues; only storage and publish errors surface to the caller.
    #[instrument(skip(self))]
    pub async fn run(&self, chat_id: i64, message_id: i64) -> Result<PipelineOutcome> {
        let Some(target) = self.repo.get(chat_id, message_id).await? else {
            warn!(chat_id, message_id, "Target message not found in store");
            return Ok(PipelineOutcome::TargetMissing);
        };

        let window = select_window(&self.repo, chat_id, message_id, self.window_size).await?;
        if window.is_empty() {
            warn!(chat_id, message_id, "No context messages found");
            return Ok(PipelineOutcome::EmptyContext);
        }
        info!(
            chat_id,
            message_id,
            window_len = window.len(),
            "Selected context window"
        );

        let relevant_ids = self.filter_relevant(&target, &window).await;

        // Project back onto the window in ascending order; the id set itself
        // carries no ordering guarantee.
        let relevant: Vec<MessageRecord> = window
            .iter()
            .filter(|msg| relevant_ids.contains(&msg.message_id))
            .cloned()
            .collect();
        if relevant.is_empty() {
            warn!(chat_id, message_id, "No relevant messages after filtering");
            return Ok(PipelineOutcome::NoRelevantMessages);
        }
        info!(
            chat_id,
            message_id,
            relevant_len = relevant.len(),
            "Filtered context window"
        );

        let rendered = render_messages(&relevant);
        let chunks = into_chunks(&rendered);
        for chunk in &chunks {
            self.publisher.send_text(chunk).await?;
        }

        let message_ids: Vec<i64> = relevant.iter().map(|m| m.message_id).collect();
        info!(
            chat_id,
            message_id,
            published = message_ids.len(),
            chunks = chunks.len(),
            "Published excerpt"
        );
        Ok(PipelineOutcome::Published {
            message_ids,
            chunks: chunks.len(),
        })
    }

    /// Classifies the window and unions the target id into the result. Any
    /// backend failure or timeout degrades to `{target}` so the run can
    /// continue with at least the target message.
    async fn filter_relevant(
        &self,
        target: &MessageRecord,
        window: &[MessageRecord],
    ) -> HashSet<i64> {
        let target_candidate = to_candidate(target);
        let candidates: Vec<Candidate> = window.iter().map(to_candidate).collect();

        let result = tokio::time::timeout(
            self.classify_timeout,
            self.classifier.classify(&target_candidate, &candidates),
        )
        .await;

        let mut ids: HashSet<i64> = match result {
            Ok(Ok(ids)) => ids.into_iter().collect(),
            Ok(Err(e)) => {
                error!(
                    backend = self.classifier.name(),
                    error = %e,
                    "Classification failed; falling back to target only"
                );
                HashSet::new()
            }
            Err(_) => {
                error!(
                    backend = self.classifier.name(),
                    timeout_secs = self.classify_timeout.as_secs(),
                    "Classification timed out; falling back to target only"
                );
                HashSet::new()
            }
        };

        ids.insert(target.message_id);
        ids
    }
}

fn to_candidate(msg: &MessageRecord) -> Candidate {
    Candidate {
        message_id: msg.message_id,
        username: msg.username.clone(),
        text: msg.text.clone(),
    }
}
