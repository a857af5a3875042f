//! Agent Shell
//!
//! Orchestrates one chat turn: record the user message, let the dispatch
//! policy short-circuit to a tool, otherwise forward the whole conversation
//! to the bound provider, then record and return the reply.
//!
//! `chat` is total once a provider is bound: tool and provider faults come
//! back as reply text and are kept in the history. The only hard failure is
//! calling it before [`AgentShell::initialize`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{DuplicatePolicy, ShellConfig};
use crate::dispatch::{DispatchPolicy, KeywordPolicy};
use crate::error::{Result, ShellError};
use crate::message::{ConversationLog, NO_HISTORY, Role};
use crate::provider::ModelProvider;
use crate::tool::{FnTool, Tool, ToolRegistry};

/// Reply used when the provider returns no output message
pub const NO_RESPONSE: &str = "No response generated.";

/// Descriptive metadata, passed through untouched
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
}

impl AgentIdentity {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            author: author.into(),
        }
    }
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self::new("Assistant", "General purpose assistant", "1.0", "unknown")
    }
}

/// Lifecycle of a shell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellState {
    /// No provider bound; `chat` fails
    Uninitialized,
    /// Provider bound
    Ready,
}

/// The conversational agent shell
pub struct AgentShell {
    identity: AgentIdentity,
    tools: ToolRegistry,
    log: ConversationLog,
    policy: Box<dyn DispatchPolicy>,
    provider: Option<Arc<dyn ModelProvider>>,
    config: ShellConfig,
}

impl AgentShell {
    /// Create an uninitialized shell with keyword dispatch and default config
    pub fn new(identity: AgentIdentity) -> Self {
        Self {
            identity,
            tools: ToolRegistry::new(),
            log: ConversationLog::new(),
            policy: Box::new(KeywordPolicy),
            provider: None,
            config: ShellConfig::default(),
        }
    }

    pub fn builder() -> AgentShellBuilder {
        AgentShellBuilder::new()
    }

    /// Bind the model provider. Rebinding replaces the previous one.
    pub fn initialize(&mut self, provider: Arc<dyn ModelProvider>) {
        info!(agent = %self.identity.name, provider = provider.name(), "provider bound");
        self.provider = Some(provider);
    }

    pub fn state(&self) -> ShellState {
        if self.provider.is_some() {
            ShellState::Ready
        } else {
            ShellState::Uninitialized
        }
    }

    /// Handle one user message and return the reply text.
    ///
    /// Fails only with [`ShellError::NotInitialized`], in which case the
    /// history is left untouched.
    pub async fn chat(&mut self, message: &str) -> Result<String> {
        let provider = self.provider.clone().ok_or(ShellError::NotInitialized)?;

        self.log.append(Role::User, message);

        let reply = match self.policy.select(message, &self.tools) {
            Some(tool) => {
                debug!(tool = tool.name(), "dispatching to tool");
                match Self::execute_tool(tool.as_ref(), message).await {
                    Ok(output) => format!("Tool '{}' executed: {}", tool.name(), output),
                    Err(e) => {
                        warn!(tool = tool.name(), error = %e, "tool execution failed");
                        format!("Error executing tool '{}': {}", tool.name(), e.reason())
                    }
                }
            }
            None => match self.generate_reply(provider.as_ref()).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider call failed");
                    format!("Error processing message: {}", e.reason())
                }
            },
        };

        self.log.append(Role::Agent, reply.clone());
        Ok(reply)
    }

    async fn execute_tool(tool: &dyn Tool, message: &str) -> Result<String> {
        tool.execute(message)
            .await
            .map_err(|e| ShellError::ToolExecution {
                tool: tool.name().to_string(),
                message: format!("{e:#}"),
            })
    }

    async fn generate_reply(&self, provider: &dyn ModelProvider) -> Result<String> {
        debug!(
            provider = provider.name(),
            turns = self.log.len(),
            model = %self.config.generation.model,
            "forwarding conversation to provider"
        );

        let generation = provider
            .generate(self.log.turns(), &self.config.generation)
            .await?;

        Ok(generation
            .last_text()
            .map_or_else(|| NO_RESPONSE.to_string(), str::to_string))
    }

    /// Register a tool, honouring the configured duplicate policy
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        match self.config.duplicate_tools {
            DuplicatePolicy::Replace => {
                self.tools.add(tool);
                Ok(())
            }
            DuplicatePolicy::Reject => self.tools.try_add(tool),
        }
    }

    /// Register an async closure as a tool
    pub fn add_fn_tool<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.add_tool(Arc::new(FnTool::new(name, description, handler)))
    }

    pub fn remove_tool(&mut self, name: &str) -> bool {
        self.tools.remove(name)
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// `"<name>: <description>"` per registered tool
    pub fn tools_description(&self) -> String {
        self.tools.describe_all()
    }

    /// Swap the dispatch strategy
    pub fn set_policy(&mut self, policy: Box<dyn DispatchPolicy>) {
        self.policy = policy;
    }

    pub fn history(&self) -> &ConversationLog {
        &self.log
    }

    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    /// Header line plus the last `summary_window` turns
    pub fn conversation_summary(&self) -> String {
        if self.log.is_empty() {
            return NO_HISTORY.to_string();
        }
        format!(
            "Conversation with {} ({} messages):\n{}",
            self.identity.name,
            self.log.len(),
            self.log.summarize(self.config.summary_window)
        )
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Log who this shell is and what it can do
    pub fn announce(&self) {
        info!(
            agent = %self.identity.name,
            version = %self.identity.version,
            description = %self.identity.description,
            tools = ?self.tools.names(),
            state = ?self.state(),
            "agent ready"
        );
    }
}

impl std::fmt::Debug for AgentShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentShell")
            .field("identity", &self.identity)
            .field("tools", &self.tools)
            .field("turns", &self.log.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AgentShell`]
pub struct AgentShellBuilder {
    identity: AgentIdentity,
    provider: Option<Arc<dyn ModelProvider>>,
    tools: Vec<Arc<dyn Tool>>,
    policy: Box<dyn DispatchPolicy>,
    config: ShellConfig,
}

impl Default for AgentShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentShellBuilder {
    pub fn new() -> Self {
        Self {
            identity: AgentIdentity::default(),
            provider: None,
            tools: Vec::new(),
            policy: Box::new(KeywordPolicy),
            config: ShellConfig::default(),
        }
    }

    pub fn identity(mut self, identity: AgentIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.identity.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.identity.description = description.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn policy(mut self, policy: Box<dyn DispatchPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    /// Assemble the shell. A missing provider leaves it uninitialized.
    pub fn build(self) -> Result<AgentShell> {
        self.config.validate()?;

        let mut shell = AgentShell::new(self.identity);
        shell.config = self.config;
        shell.policy = self.policy;
        for tool in self.tools {
            shell.add_tool(tool)?;
        }
        if let Some(provider) = self.provider {
            shell.initialize(provider);
        }
        Ok(shell)
    }
}
