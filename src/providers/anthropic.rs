/*!
 * Anthropic messages client speaking the segment protocol.
 */

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::{Config, ProviderKind};
use crate::document_model::TextSegment;
use crate::errors::ProviderError;

use super::{SYSTEM_PROMPT, TranslationProvider, build_request_payload, parse_translation_response};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic client for interacting with the messages API
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
    /// Default model when the caller does not name one
    default_model: String,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
struct MessagesRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<Message>,

    /// System prompt to guide the model
    system: String,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    /// Role of the message sender (user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    /// The content blocks of the response
    content: Vec<ContentBlock>,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
struct ContentBlock {
    /// The type of content
    #[serde(rename = "type")]
    content_type: String,

    /// The actual text content
    #[serde(default)]
    text: String,
}

impl Anthropic {
    /// Create a client from the application configuration.
    ///
    /// Fails fast with a configuration error when no API key is available.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let kind = ProviderKind::Anthropic;
        let api_key = config.get_api_key(&kind);
        if api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Anthropic configuration missing. Set ANTHROPIC_API_KEY or choose a different \
                 provider"
                    .to_string(),
            ));
        }

        Ok(Self::new(
            api_key,
            config.get_endpoint(&kind),
            config.get_model(&kind),
            config.get_timeout_secs(&kind),
        ))
    }

    /// Create a new Anthropic client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    async fn complete(&self, request: MessagesRequest) -> Result<String, ProviderError> {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let api_url = format!("{}/v1/messages", base);

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let messages_response = response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text: String = messages_response
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text.as_str())
            .collect();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for Anthropic {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn translate(
        &self,
        segments: &[TextSegment],
        source_language: Option<&str>,
        target_language: &str,
        model: Option<&str>,
    ) -> Result<HashMap<String, String>, ProviderError> {
        if segments.is_empty() {
            return Ok(HashMap::new());
        }

        let payload = build_request_payload(segments, source_language, target_language)?;
        let request = MessagesRequest {
            model: model.unwrap_or(&self.default_model).to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: payload,
            }],
            system: SYSTEM_PROMPT.to_string(),
            max_tokens: 4096,
            temperature: Some(0.3),
        };

        let text = self.complete(request).await?;
        parse_translation_response(&text)
    }
}
