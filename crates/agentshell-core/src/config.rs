//! Shell Configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};
use crate::provider::GenerationOptions;

/// What `AgentShell::add_tool` does when a name is already taken
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last registration wins
    #[default]
    Replace,
    /// Keep the first registration and report an error
    Reject,
}

/// Shell configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Turns shown by `conversation_summary`
    #[serde(default = "default_summary_window")]
    pub summary_window: usize,

    /// Tool name collision handling
    #[serde(default)]
    pub duplicate_tools: DuplicatePolicy,

    /// Options passed to the provider on every call
    #[serde(default)]
    pub generation: GenerationOptions,
}

fn default_summary_window() -> usize {
    5
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            summary_window: default_summary_window(),
            duplicate_tools: DuplicatePolicy::default(),
            generation: GenerationOptions::default(),
        }
    }
}

impl ShellConfig {
    /// Parse from JSON, filling omitted fields with defaults
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.summary_window == 0 {
            return Err(ShellError::Config("summary_window must be at least 1".into()));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ShellError::Config(format!(
                "temperature {} outside 0.0..=2.0",
                self.generation.temperature
            )));
        }
        Ok(())
    }
}
