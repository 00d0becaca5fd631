//! OpenAI-compatible classification backend.
//!
//! Wraps async-openai. A custom base URL points the same backend at any
//! OpenAI-compatible API (Groq and similar), so no separate variant exists
//! for those.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::{build_prompt, parse_relevant_ids, Candidate, ClassifyError, RelevanceClassifier};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes chat conversations. Always respond with valid JSON.";

pub struct OpenAiClassifier {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClassifier {
    /// Builds a classifier against the default OpenAI API base.
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Builds a classifier against an OpenAI-compatible API base.
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl RelevanceClassifier for OpenAiClassifier {
    fn name(&self) -> &'static str {
        "openai"
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

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .temperature(0.1)
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| ClassifyError::Request(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| ClassifyError::Request(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(ClassifyError::EmptyResponse)?;

        debug!(raw = %content, "Classifier raw response");
        parse_relevant_ids(&content)
    }
}
