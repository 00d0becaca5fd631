//! Google Gemini classification backend.
//!
//! Talks to the `generateContent` REST endpoint over reqwest. The response is
//! requested as JSON so the reply text is the id object itself.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::{build_prompt, parse_relevant_ids, Candidate, ClassifyError, RelevanceClassifier};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClassifier {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClassifier {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ClassifyError> {
        Self::with_base_url(api_key, DEFAULT_GEMINI_BASE_URL.to_string(), model, timeout)
    }

    /// Custom API base; tests point this at a local mock server.
    pub fn with_base_url(
        api_key: String,
        api_base: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_base,
            api_key,
            model,
        })
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl RelevanceClassifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, target, candidates), fields(target_id = target.message_id))]
    async fn classify(
        &self,
        target: &Candidate,
        candidates: &[Candidate],
    ) -> Result<Vec<i64>, ClassifyError> {
        let prompt = build_prompt(target, candidates);

        info!(
            model = %self.model,
            candidate_count = candidates.len(),
            "Requesting relevance classification"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.1,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Request(format!("HTTP {}: {}", status, text)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Malformed(e.to_string()))?;

        let content = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(ClassifyError::EmptyResponse)?;

        debug!(raw = %content, "Classifier raw response");
        parse_relevant_ids(&content)
    }
}
