//! Ollama Model Provider
//!
//! Implementation of `ModelProvider` for local Ollama inference.

use std::time::Duration;

use agentshell_core::{
    error::{Result, ShellError},
    message::{Role, Turn},
    provider::{Generation, GenerationOptions, ModelProvider},
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, ChatMessageResponse, MessageRole, request::ChatMessageRequest},
    models::ModelOptions as OllamaOptions,
};

/// Ollama provider configuration
#[derive(Clone, Debug, PartialEq)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Model override; falls back to the shell's generation options
    pub model: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            model: None,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST")
            .unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);
        let model = std::env::var("OLLAMA_MODEL").ok().filter(|m| !m.is_empty());

        Self {
            host,
            port,
            model,
            ..Default::default()
        }
    }

    /// Base URL, e.g. `http://localhost:11434`
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// Ollama model provider
pub struct OllamaProvider {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::from_config(OllamaConfig {
            host: host.into(),
            port,
            ..Default::default()
        })
    }

    /// Create from configuration
    ///
    /// Fails on a host that is not an absolute URL or when the HTTP client
    /// cannot be built.
    pub fn from_config(config: OllamaConfig) -> Result<Self> {
        reqwest::Url::parse(&config.host)
            .map_err(|e| ShellError::Config(format!("invalid Ollama host '{}': {e}", config.host)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ShellError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client: Ollama::new_with_client(config.host.as_str(), config.port, http),
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Result<Self> {
        Self::from_config(OllamaConfig::default())
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn resolve_model(&self, options: &GenerationOptions) -> String {
        self.config
            .model
            .clone()
            .unwrap_or_else(|| options.model.clone())
    }

    /// Convert shell turns to Ollama messages
    fn convert_messages(turns: &[Turn], system_prompt: Option<&str>) -> Vec<ChatMessage> {
        let system = system_prompt.map(|prompt| ChatMessage::new(MessageRole::System, prompt.to_string()));

        system
            .into_iter()
            .chain(turns.iter().map(|t| {
                let role = match t.role {
                    Role::User => MessageRole::User,
                    Role::Agent => MessageRole::Assistant,
                };
                ChatMessage::new(role, t.text.clone())
            }))
            .collect()
    }

    /// Convert an Ollama response into a shell generation
    fn convert_response(response: ChatMessageResponse) -> Generation {
        let content = response.message.content;
        Generation {
            messages: if content.is_empty() {
                Vec::new()
            } else {
                vec![Turn::agent(content)]
            },
            model: response.model,
        }
    }

    /// Build Ollama generation options
    fn build_options(opts: &GenerationOptions) -> OllamaOptions {
        OllamaOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(i32::try_from(opts.max_tokens).unwrap_or(i32::MAX))
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Generation> {
        let model = self.resolve_model(options);
        let messages = Self::convert_messages(turns, options.system_prompt.as_deref());

        tracing::debug!(model = %model, messages = messages.len(), "ollama chat request");

        let request = ChatMessageRequest::new(model, messages).options(Self::build_options(options));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| ShellError::Provider(e.to_string()))?;

        Ok(Self::convert_response(response))
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
