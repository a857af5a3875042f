//! Model Provider Strategy
//!
//! Common interface for language-model backends. The shell holds an
//! `Arc<dyn ModelProvider>` bound once via `AgentShell::initialize` and never
//! reaches for ambient state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agentshell_core::provider::{GenerationOptions, ModelProvider};
//!
//! let generation = provider.generate(log.turns(), &GenerationOptions::default()).await?;
//! let reply = generation.last_text();
//! ```

pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Turn;

/// Configuration for model generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "llama3.2", "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Instructions prepended to the conversation, if the backend takes them
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_model() -> String { "llama3.2".into() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 2048 }
fn default_top_p() -> f32 { 0.9 }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            system_prompt: None,
        }
    }
}

/// Response from a provider call
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Generation {
    /// Output messages, oldest first
    pub messages: Vec<Turn>,

    /// Model that produced the output
    pub model: String,
}

impl Generation {
    /// Single-message generation
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            messages: vec![Turn::agent(text)],
            model: model.into(),
        }
    }

    /// Text of the last output message
    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }
}

/// Strategy trait for model providers
///
/// Implement this trait to add support for new backends.
/// The shell works exclusively through this interface.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Display name for logging
    fn name(&self) -> &str;

    /// Generate a reply from the full ordered conversation
    async fn generate(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Generation>;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.max_tokens, 2048);
        assert_eq!(opts.model, "llama3.2");
    }

    #[test]
    fn test_generation_options_partial_json() {
        let opts: GenerationOptions = serde_json::from_str(r#"{"model": "mistral"}"#).unwrap();
        assert_eq!(opts.model, "mistral");
        assert_eq!(opts.top_p, 0.9);
    }

    #[test]
    fn test_last_text() {
        let mut generation = Generation::text("m", "first");
        generation.messages.push(Turn::agent("second"));
        assert_eq!(generation.last_text(), Some("second"));

        assert_eq!(Generation::default().last_text(), None);
    }
}
