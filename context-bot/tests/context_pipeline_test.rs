//! End-to-end pipeline tests with an in-memory store, a scripted classifier
//! and a recording publisher.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use classifier::{Candidate, ClassifyError, RelevanceClassifier};
use context_bot::{ChannelPublisher, ContextPipeline, PipelineOutcome};
use storage::{MessageRecord, MessageRepository};

enum Script {
    Ids(Vec<i64>),
    Fail,
}

struct ScriptedClassifier {
    script: Script,
}

#[async_trait]
impl RelevanceClassifier for ScriptedClassifier {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn classify(
        &self,
        _target: &Candidate,
        _candidates: &[Candidate],
    ) -> Result<Vec<i64>, ClassifyError> {
        match &self.script {
            Script::Ids(ids) => Ok(ids.clone()),
            Script::Fail => Err(ClassifyError::Request("backend unreachable".to_string())),
        }
    }
}

struct RecordingPublisher {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChannelPublisher for RecordingPublisher {
    async fn send_text(&self, text: &str) -> context_bot::Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

async fn repo() -> MessageRepository {
    MessageRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create repository")
}

async fn seed(repo: &MessageRepository, chat_id: i64, id: i64, reply_to: Option<i64>, text: &str) {
    let record = MessageRecord {
        chat_id,
        message_id: id,
        user_id: 1000 + id,
        username: Some(format!("user{}", id)),
        text: text.to_string(),
        reply_to_message_id: reply_to,
        created_at: Utc::now(),
    };
    repo.save(&record).await.expect("Failed to save message");
}

fn pipeline(
    repo: MessageRepository,
    script: Script,
    window_size: i64,
) -> (ContextPipeline, Arc<Mutex<Vec<String>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let publisher = Arc::new(RecordingPublisher { sent: sent.clone() });
    let classifier = Arc::new(ScriptedClassifier { script });
    let pipeline = ContextPipeline::new(
        repo,
        classifier,
        publisher,
        window_size,
        Duration::from_secs(5),
    );
    (pipeline, sent)
}

#[tokio::test]
async fn reply_chain_with_unreachable_backend_publishes_target_only() {
    let repo = repo().await;
    let chat = 77;

    // 120 is the thread root; 125 replies to it, 130 replies to 125.
    seed(&repo, chat, 120, None, "thread start").await;
    for id in 121..=124 {
        seed(&repo, chat, id, None, &format!("chatter {}", id)).await;
    }
    seed(&repo, chat, 125, Some(120), "mid thread").await;
    seed(&repo, chat, 130, Some(125), "the reacted message").await;

    let (pipeline, sent) = pipeline(repo, Script::Fail, 20);
    let outcome = pipeline.run(chat, 130).await.expect("Pipeline run failed");

    assert_eq!(
        outcome,
        PipelineOutcome::Published {
            message_ids: vec![130],
            chunks: 1,
        }
    );

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], "*@user130:* the reacted message");
}

#[tokio::test]
async fn backward_window_publishes_classifier_subset_in_order() {
    let repo = repo().await;
    let chat = 77;

    for id in 31..=50 {
        seed(&repo, chat, id, None, &format!("message {}", id)).await;
    }

    // Deliberately out of ascending order; projection must reorder.
    let (pipeline, sent) = pipeline(repo, Script::Ids(vec![50, 45, 48]), 20);
    let outcome = pipeline.run(chat, 50).await.expect("Pipeline run failed");

    assert_eq!(
        outcome,
        PipelineOutcome::Published {
            message_ids: vec![45, 48, 50],
            chunks: 1,
        }
    );

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        "*@user45:* message 45\n*@user48:* message 48\n*@user50:* message 50"
    );
}

#[tokio::test]
async fn hallucinated_ids_outside_window_are_ignored() {
    let repo = repo().await;
    let chat = 77;

    for id in 10..=12 {
        seed(&repo, chat, id, None, &format!("message {}", id)).await;
    }

    let (pipeline, _sent) = pipeline(repo, Script::Ids(vec![11, 12, 9999]), 20);
    let outcome = pipeline.run(chat, 12).await.expect("Pipeline run failed");

    assert_eq!(
        outcome,
        PipelineOutcome::Published {
            message_ids: vec![11, 12],
            chunks: 1,
        }
    );
}

#[tokio::test]
async fn missing_target_aborts_without_publishing() {
    let repo = repo().await;

    let (pipeline, sent) = pipeline(repo, Script::Ids(vec![1]), 20);
    let outcome = pipeline.run(77, 999).await.expect("Pipeline run failed");

    assert_eq!(outcome, PipelineOutcome::TargetMissing);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn long_excerpt_is_published_in_bounded_chunks() {
    let repo = repo().await;
    let chat = 77;

    let filler = "a".repeat(400);
    for id in 1..=30 {
        seed(&repo, chat, id, None, &filler).await;
    }

    let all_ids: Vec<i64> = (1..=30).collect();
    let (pipeline, sent) = pipeline(repo, Script::Ids(all_ids.clone()), 30);
    let outcome = pipeline.run(chat, 30).await.expect("Pipeline run failed");

    let PipelineOutcome::Published { message_ids, chunks } = outcome else {
        panic!("Expected a published outcome");
    };
    assert_eq!(message_ids, all_ids);
    assert!(chunks >= 3);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), chunks);
    for chunk in sent.iter() {
        assert!(chunk.chars().count() <= context_bot::HARD_MESSAGE_LIMIT);
    }

    // Lines survive chunking intact and in order.
    let lines: Vec<String> = sent
        .iter()
        .flat_map(|c| c.split('\n').map(|l| l.to_string()))
        .collect();
    assert_eq!(lines.len(), 30);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &format!("*@user{}:* {}", i + 1, filler));
    }
}
