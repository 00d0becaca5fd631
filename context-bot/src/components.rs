//! Builds runtime components from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use classifier::{GeminiClassifier, OpenAiClassifier, RelevanceClassifier};

use crate::config::{BotConfig, ClassifierBackend};

/// Builds the configured relevance-classification backend.
pub fn build_classifier(config: &BotConfig) -> Result<Arc<dyn RelevanceClassifier>> {
    match config.classifier_backend {
        ClassifierBackend::OpenAi => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY not set")?;
            let classifier = match config.openai_base_url.clone() {
                Some(base_url) => {
                    OpenAiClassifier::with_base_url(api_key, base_url, config.openai_model.clone())
                }
                None => OpenAiClassifier::new(api_key, config.openai_model.clone()),
            };
            Ok(Arc::new(classifier))
        }
        ClassifierBackend::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .context("GEMINI_API_KEY not set")?;
            let timeout = Duration::from_secs(config.classify_timeout_secs);
            let classifier = match config.gemini_base_url.clone() {
                Some(base_url) => GeminiClassifier::with_base_url(
                    api_key,
                    base_url,
                    config.gemini_model.clone(),
                    timeout,
                )?,
                None => GeminiClassifier::new(api_key, config.gemini_model.clone(), timeout)?,
            };
            Ok(Arc::new(classifier))
        }
    }
}
