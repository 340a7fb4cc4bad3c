/*!
 * OpenAI chat-completions client speaking the segment protocol.
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

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// OpenAI client for interacting with the chat completions API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
    /// Default model when the caller does not name one
    default_model: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Completion choices
    choices: Vec<ChatChoice>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The generated message
    message: ChatMessage,
}

impl OpenAI {
    /// Create a client from the application configuration.
    ///
    /// Fails fast with a configuration error when no API key is available,
    /// before any document mutation occurs.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let kind = ProviderKind::OpenAI;
        let api_key = config.get_api_key(&kind);
        if api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "OpenAI configuration missing. Set OPENAI_API_KEY or choose a different provider"
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

    /// Create a new OpenAI client
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

    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let api_url = format!("{}/chat/completions", base);

        let response = self
            .client
            .post(&api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for OpenAI {
    fn name(&self) -> &str {
        "openai"
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
        let request = ChatRequest {
            model: model.unwrap_or(&self.default_model).to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: payload,
                },
            ],
            temperature: Some(0.3),
        };

        let text = self.complete(request).await?;
        parse_translation_response(&text)
    }
}
