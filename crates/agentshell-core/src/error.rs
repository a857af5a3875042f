//! Error Types

use thiserror::Error;

/// Result type alias for shell operations
pub type Result<T> = std::result::Result<T, ShellError>;

/// Shell error types
///
/// Only [`ShellError::NotInitialized`] (and [`ShellError::DuplicateTool`] in
/// strict registration mode) ever reach a caller of the shell. Tool and
/// provider faults are folded into the reply text.
#[derive(Error, Debug)]
pub enum ShellError {
    /// `chat` was called before a model provider was bound
    #[error("Chat model not initialized. Call initialize(provider) first.")]
    NotInitialized,

    /// A tool handler failed
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// The model provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool name already registered (strict registration only)
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl ShellError {
    /// Whether the error is a caller mistake rather than a runtime fault
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            ShellError::NotInitialized | ShellError::DuplicateTool(_) | ShellError::Config(_)
        )
    }

    /// The bare failure detail, without the variant prefix
    pub fn reason(&self) -> String {
        match self {
            ShellError::ToolExecution { message, .. } => message.clone(),
            ShellError::Provider(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Short machine-readable code, used by HTTP front-ends
    pub fn code(&self) -> &'static str {
        match self {
            ShellError::NotInitialized => "NOT_INITIALIZED",
            ShellError::ToolExecution { .. } => "TOOL_ERROR",
            ShellError::Provider(_) => "PROVIDER_ERROR",
            ShellError::DuplicateTool(_) => "DUPLICATE_TOOL",
            ShellError::Config(_) => "CONFIG_ERROR",
            ShellError::Json(_) => "JSON_ERROR",
            ShellError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<anyhow::Error> for ShellError {
    fn from(err: anyhow::Error) -> Self {
        ShellError::Other(err.to_string())
    }
}
