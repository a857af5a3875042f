//! Chat Assistant
//!
//! High level wrapper that hides provider and tool wiring behind a few calls.

use std::sync::Arc;

use agentshell_core::{AgentIdentity, AgentShell, ModelProvider, Result, Tool};

#[cfg(feature = "ollama")]
use crate::ollama::{OllamaConfig, OllamaProvider};

/// Ready-to-use assistant around an [`AgentShell`]
#[derive(Debug)]
pub struct ChatAssistant {
    shell: AgentShell,
}

impl Default for ChatAssistant {
    fn default() -> Self {
        Self::new(AgentIdentity::default())
    }
}

impl ChatAssistant {
    pub fn new(identity: AgentIdentity) -> Self {
        Self {
            shell: AgentShell::new(identity),
        }
    }

    /// Wrap an already configured shell
    pub fn from_shell(shell: AgentShell) -> Self {
        Self { shell }
    }

    /// Bind a local Ollama backend
    #[cfg(feature = "ollama")]
    pub fn init(&mut self, config: OllamaConfig) -> Result<()> {
        self.init_with(Arc::new(OllamaProvider::from_config(config)?));
        Ok(())
    }

    /// Bind any provider
    pub fn init_with(&mut self, provider: Arc<dyn ModelProvider>) {
        self.shell.initialize(provider);
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        self.shell.add_tool(tool)
    }

    /// Register several tools, stopping at the first rejected one
    pub fn register_tools<I>(&mut self, tools: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        tools.into_iter().try_for_each(|tool| self.register_tool(tool))
    }

    pub async fn chat(&mut self, message: &str) -> Result<String> {
        self.shell.chat(message).await
    }

    pub fn shell(&self) -> &AgentShell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut AgentShell {
        &mut self.shell
    }

    pub fn into_shell(self) -> AgentShell {
        self.shell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentshell_core::provider::mock::ScriptedProvider;
    use agentshell_core::{FnTool, ShellError, ShellState};

    fn tool(name: &str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, format!("{name} tool"), |input: String| async move {
            Ok(input.len().to_string())
        }))
    }

    #[test]
    fn test_default_identity() {
        let assistant = ChatAssistant::default();
        let identity = assistant.shell().identity();
        assert_eq!(identity.name, "Assistant");
        assert_eq!(identity.description, "General purpose assistant");
        assert_eq!(identity.version, "1.0");
        assert_eq!(identity.author, "unknown");
        assert_eq!(assistant.shell().state(), ShellState::Uninitialized);
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_init_binds_provider() {
        let mut assistant = ChatAssistant::default();
        assistant.init(OllamaConfig::default()).unwrap();
        assert_eq!(assistant.shell().state(), ShellState::Ready);
    }

    #[test]
    fn test_register_tools() {
        let mut assistant = ChatAssistant::default();
        assistant
            .register_tools(vec![tool("count"), tool("measure")])
            .unwrap();
        assert_eq!(assistant.shell().tools().names(), vec!["count", "measure"]);
    }

    #[tokio::test]
    async fn test_chat_requires_init() {
        let mut assistant = ChatAssistant::default();
        let err = assistant.chat("hello").await.unwrap_err();
        assert!(matches!(err, ShellError::NotInitialized));
    }

    #[tokio::test]
    async fn test_chat_routes_through_shell() {
        let mut assistant = ChatAssistant::default();
        assistant.init_with(Arc::new(ScriptedProvider::with_replies(["hi!"])));
        assistant.register_tool(tool("count")).unwrap();

        assert_eq!(assistant.chat("count this").await.unwrap(), "Tool 'count' executed: 10");
        assert_eq!(assistant.chat("hello").await.unwrap(), "hi!");
        assert_eq!(assistant.shell().history().len(), 4);
    }
}
