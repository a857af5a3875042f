//! Mock Providers
//!
//! For testing and demo purposes. No network access.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Generation, GenerationOptions, ModelProvider};
use crate::error::{Result, ShellError};
use crate::message::Turn;

/// Replies from a queue, then echoes the last user turn
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Generation>>,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue plain-text replies
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for reply in replies {
            provider.push(Generation::text("scripted", reply));
        }
        provider
    }

    /// Queue a full generation (e.g. one with no messages)
    pub fn push(&self, generation: Generation) {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(generation);
    }

    /// Number of turns passed to each `generate` call so far
    pub fn calls(&self) -> Vec<usize> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, turns: &[Turn], _options: &GenerationOptions) -> Result<Generation> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(turns.len());

        let queued = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();

        Ok(queued.unwrap_or_else(|| {
            let echo = turns.last().map(|t| t.text.clone()).unwrap_or_default();
            Generation::text("scripted", format!("echo: {echo}"))
        }))
    }
}

/// Always fails with the configured message
#[derive(Debug, Clone)]
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl ModelProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _turns: &[Turn], _options: &GenerationOptions) -> Result<Generation> {
        Err(ShellError::Provider(self.message.clone()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_echo() {
        let provider = ScriptedProvider::with_replies(["hello"]);
        let turns = vec![Turn::user("hi")];
        let opts = GenerationOptions::default();

        let first = provider.generate(&turns, &opts).await.unwrap();
        assert_eq!(first.last_text(), Some("hello"));

        let second = provider.generate(&turns, &opts).await.unwrap();
        assert_eq!(second.last_text(), Some("echo: hi"));

        assert_eq!(provider.calls(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = FailingProvider::new("timeout");
        let err = provider
            .generate(&[], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider error: timeout");
        assert!(!provider.health_check().await.unwrap());
    }
}
