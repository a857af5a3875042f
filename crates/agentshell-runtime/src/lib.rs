//! # agentshell-runtime
//!
//! Runtime providers for the agentshell system.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via `ollama-rs`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agentshell_runtime::{ChatAssistant, OllamaConfig};
//!
//! let mut assistant = ChatAssistant::default();
//! assistant.init(OllamaConfig::from_env())?;
//! let reply = assistant.chat("hello").await?;
//! ```

pub mod assistant;
#[cfg(feature = "ollama")]
pub mod ollama;

pub use assistant::ChatAssistant;
#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agentshell_core::{
    AgentIdentity, AgentShell, ModelProvider, Result, Role, ShellError, Tool, ToolRegistry,
};
