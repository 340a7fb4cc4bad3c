use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language hint (name or ISO-639 code), optional
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language (name or ISO-639 code)
    #[serde(default)]
    pub target_language: Option<String>,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions API
    #[default]
    OpenAI,
    /// Anthropic messages API
    Anthropic,
    /// Identity provider returning its input unchanged
    Echo,
}

impl ProviderKind {
    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Echo => "echo".to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "gpt" | "default" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "echo" | "noop" | "identity" => Ok(Self::Echo),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Selected provider
    #[serde(default)]
    pub provider: ProviderKind,

    /// Approximate maximum characters per translation batch
    #[serde(default = "default_batch_budget")]
    pub batch_budget: usize,

    /// Automatic retry attempts per batch before escalation
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff delays in seconds, indexed by attempt (clamped to last)
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: Vec<u64>,

    /// Per-provider settings
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            batch_budget: default_batch_budget(),
            retry_count: default_retry_count(),
            retry_backoff_secs: default_retry_backoff_secs(),
            available_providers: default_available_providers(),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model name
    #[serde(default = "String::new")]
    pub model: String,

    /// API key; when empty, the provider's environment variable is used
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; when empty, the provider's public endpoint is used
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Provider config with defaults for the given provider type
    pub fn new(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            ProviderKind::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            ProviderKind::Echo => Self {
                provider_type: "echo".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_batch_budget() -> usize {
    2000
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_secs() -> Vec<u64> {
    vec![1, 4, 9]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::OpenAI),
        ProviderConfig::new(ProviderKind::Anthropic),
        ProviderConfig::new(ProviderKind::Echo),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: None,
            target_language: None,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Write this configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Settings for the given provider type, if configured
    pub fn provider_config(&self, kind: &ProviderKind) -> Option<&ProviderConfig> {
        let wanted = kind.to_lowercase_string();
        self.translation
            .available_providers
            .iter()
            .find(|p| p.provider_type == wanted)
    }

    /// Model for the given provider, falling back to the built-in default
    pub fn get_model(&self, kind: &ProviderKind) -> String {
        let configured = self
            .provider_config(kind)
            .map(|p| p.model.clone())
            .unwrap_or_default();
        if !configured.is_empty() {
            return configured;
        }
        match kind {
            ProviderKind::OpenAI => default_openai_model(),
            ProviderKind::Anthropic => default_anthropic_model(),
            ProviderKind::Echo => String::new(),
        }
    }

    /// API key for the given provider, falling back to the environment
    pub fn get_api_key(&self, kind: &ProviderKind) -> String {
        let configured = self
            .provider_config(kind)
            .map(|p| p.api_key.clone())
            .unwrap_or_default();
        if !configured.is_empty() {
            return configured;
        }
        let env_name = match kind {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Echo => return String::new(),
        };
        std::env::var(env_name).unwrap_or_default()
    }

    /// Endpoint for the given provider; empty means the public API
    pub fn get_endpoint(&self, kind: &ProviderKind) -> String {
        self.provider_config(kind)
            .map(|p| p.endpoint.clone())
            .unwrap_or_default()
    }

    /// Request timeout in seconds for the given provider
    pub fn get_timeout_secs(&self, kind: &ProviderKind) -> u64 {
        self.provider_config(kind)
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        for provider in &self.translation.available_providers {
            if provider.provider_type.parse::<ProviderKind>().is_err() {
                return Err(anyhow!(
                    "Unknown provider type in configuration: {}",
                    provider.provider_type
                ));
            }
            if !provider.endpoint.is_empty() {
                Url::parse(&provider.endpoint).with_context(|| {
                    format!(
                        "Invalid endpoint for provider {}: {}",
                        provider.provider_type, provider.endpoint
                    )
                })?;
            }
        }

        if self.translation.retry_backoff_secs.is_empty() {
            return Err(anyhow!("retry_backoff_secs must contain at least one delay"));
        }

        Ok(())
    }
}
