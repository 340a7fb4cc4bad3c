/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM
 * providers (OpenAI, Anthropic), the echo identity provider used as the
 * canonical test double, and a configurable mock for failure-path tests.
 * All providers speak the same segment protocol: a JSON request listing
 * `{id, text}` segments, a JSON array of `{id, translated}` in response.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app_config::{Config, ProviderKind};
use crate::document_model::TextSegment;
use crate::errors::ProviderError;

pub mod anthropic;
pub mod echo;
pub mod mock;
pub mod openai;

/// Common trait for all translation providers.
///
/// Implementations must be safe to call with an empty segment list (return
/// an empty mapping, no network activity) and must surface every transport,
/// parsing, or remote-service failure as a [`ProviderError`]. A mapping
/// missing some requested ids is not an error here; the runner's
/// reconciliation step detects and handles omissions.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short provider identifier for logs and the run summary.
    fn name(&self) -> &str;

    /// Translate the given segments, returning translated text by segment id.
    async fn translate(
        &self,
        segments: &[TextSegment],
        source_language: Option<&str>,
        target_language: &str,
        model: Option<&str>,
    ) -> Result<HashMap<String, String>, ProviderError>;
}

/// System prompt shared by the LLM-backed providers.
pub(crate) const SYSTEM_PROMPT: &str = "You are a professional translator. Return only JSON. \
    Translate the provided text segments into the requested language. \
    Preserve formatting, placeholders, numbers, and markup such as <run> tags. \
    Reply with a JSON array of objects {\"id\": ..., \"translated\": ...}. \
    Do not add commentary.";

#[derive(Debug, Serialize)]
struct SegmentPayload<'a> {
    id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct RequestPayload<'a> {
    target_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_language: Option<&'a str>,
    segments: Vec<SegmentPayload<'a>>,
}

/// One translated segment in a provider response.
#[derive(Debug, Deserialize)]
struct TranslatedSegment {
    id: String,
    translated: String,
}

/// Serialize the user payload the LLM providers send.
pub fn build_request_payload(
    segments: &[TextSegment],
    source_language: Option<&str>,
    target_language: &str,
) -> Result<String, ProviderError> {
    let payload = RequestPayload {
        target_language,
        source_language,
        segments: segments
            .iter()
            .map(|segment| SegmentPayload {
                id: &segment.segment_id,
                text: &segment.text,
            })
            .collect(),
    };
    serde_json::to_string(&payload)
        .map_err(|e| ProviderError::ParseError(format!("could not serialize request: {}", e)))
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the JSON array of `{id, translated}` objects into a mapping.
pub fn parse_translation_response(
    text: &str,
) -> Result<HashMap<String, String>, ProviderError> {
    let body = strip_code_fence(text);
    let items: Vec<TranslatedSegment> = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("invalid JSON in response: {}", e)))?;

    Ok(items
        .into_iter()
        .map(|item| (item.id, item.translated))
        .collect())
}

/// Factory: create a provider by name, falling back to the configured one.
///
/// Unknown names fail fast with a configuration error before any document
/// mutation occurs.
pub fn build_provider(
    name: Option<&str>,
    config: &Config,
) -> Result<Box<dyn TranslationProvider>, ProviderError> {
    let kind = match name {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "openai" | "gpt" | "default" => ProviderKind::OpenAI,
            "anthropic" | "claude" => ProviderKind::Anthropic,
            "echo" | "noop" | "identity" => ProviderKind::Echo,
            _ => {
                return Err(ProviderError::Configuration(format!(
                    "Unknown translation provider '{}'",
                    raw
                )));
            }
        },
        None => config.translation.provider.clone(),
    };

    match kind {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAI::from_config(config)?)),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::from_config(config)?)),
        ProviderKind::Echo => Ok(Box::new(echo::EchoProvider)),
    }
}
