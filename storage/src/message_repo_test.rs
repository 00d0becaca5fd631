//! Unit tests for MessageRepository.
//!
//! Covers idempotent ingestion, key lookups, and the id-window queries.

use chrono::Utc;

use crate::message_repo::MessageRepository;
use crate::models::MessageRecord;

fn record(chat_id: i64, message_id: i64, text: &str, reply_to: Option<i64>) -> MessageRecord {
    MessageRecord {
        chat_id,
        message_id,
        user_id: 1000 + message_id,
        username: Some(format!("user{}", message_id)),
        text: text.to_string(),
        reply_to_message_id: reply_to,
        created_at: Utc::now(),
    }
}

async fn repo() -> MessageRepository {
    MessageRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create repository")
}

#[tokio::test]
async fn test_save_and_get() {
    let repo = repo().await;

    repo.save(&record(1, 10, "hello", Some(5)))
        .await
        .expect("Failed to save message");

    let retrieved = repo.get(1, 10).await.expect("Failed to get message");
    assert!(retrieved.is_some());

    let message = retrieved.unwrap();
    assert_eq!(message.chat_id, 1);
    assert_eq!(message.message_id, 10);
    assert_eq!(message.text, "hello");
    assert_eq!(message.reply_to_message_id, Some(5));
}

#[tokio::test]
async fn test_get_not_found() {
    let repo = repo().await;

    let retrieved = repo.get(1, 999).await.expect("Failed to query");
    assert!(retrieved.is_none());
}

#[tokio::test]
async fn test_save_duplicate_keeps_first_content() {
    let repo = repo().await;

    repo.save(&record(1, 10, "original", None))
        .await
        .expect("Failed to save message");
    repo.save(&record(1, 10, "overwrite attempt", None))
        .await
        .expect("Duplicate save should not error");

    let message = repo
        .get(1, 10)
        .await
        .expect("Failed to get message")
        .expect("Message should exist");
    assert_eq!(message.text, "original");

    let stats = repo.stats().await.expect("Failed to get stats");
    assert_eq!(stats.total_messages, 1);
}

#[tokio::test]
async fn test_exists() {
    let repo = repo().await;

    repo.save(&record(1, 10, "hello", None))
        .await
        .expect("Failed to save message");

    assert!(repo.exists(1, 10).await.expect("Failed to query"));
    assert!(!repo.exists(1, 11).await.expect("Failed to query"));
    assert!(!repo.exists(2, 10).await.expect("Failed to query"));
}

#[tokio::test]
async fn test_range_inclusive_ascending() {
    let repo = repo().await;

    for id in [5, 7, 10, 12, 15] {
        repo.save(&record(1, id, &format!("msg {}", id), None))
            .await
            .expect("Failed to save message");
    }

    let messages = repo.range(1, 7, 12).await.expect("Failed to query range");
    let ids: Vec<i64> = messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![7, 10, 12]);
}

#[tokio::test]
async fn test_before_or_at_ascending_with_limit() {
    let repo = repo().await;

    for id in 1..=30 {
        repo.save(&record(1, id, &format!("msg {}", id), None))
            .await
            .expect("Failed to save message");
    }

    let messages = repo
        .before_or_at(1, 25, 10)
        .await
        .expect("Failed to query before_or_at");

    let ids: Vec<i64> = messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, (16..=25).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_before_or_at_includes_given_id() {
    let repo = repo().await;

    repo.save(&record(1, 50, "target", None))
        .await
        .expect("Failed to save message");

    let messages = repo
        .before_or_at(1, 50, 20)
        .await
        .expect("Failed to query before_or_at");

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, 50);
}

#[tokio::test]
async fn test_from_onward_ascending_with_limit() {
    let repo = repo().await;

    for id in 100..=140 {
        repo.save(&record(1, id, &format!("msg {}", id), None))
            .await
            .expect("Failed to save message");
    }

    let messages = repo
        .from_onward(1, 120, 5)
        .await
        .expect("Failed to query from_onward");

    let ids: Vec<i64> = messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![120, 121, 122, 123, 124]);
}

#[tokio::test]
async fn test_queries_scoped_by_chat() {
    let repo = repo().await;

    repo.save(&record(1, 10, "chat one", None))
        .await
        .expect("Failed to save message");
    repo.save(&record(2, 10, "chat two", None))
        .await
        .expect("Failed to save message");
    repo.save(&record(2, 11, "chat two again", None))
        .await
        .expect("Failed to save message");

    let messages = repo
        .from_onward(2, 0, 10)
        .await
        .expect("Failed to query from_onward");
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.chat_id == 2));
}
