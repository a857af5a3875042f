//! Tool System
//!
//! Named, described, callable actions the shell can run instead of asking
//! the model. Tools are supplied by the embedding application and kept in a
//! [`ToolRegistry`] in registration order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use tracing::info;

use crate::error::{Result, ShellError};

/// Empty-registry sentinel returned by [`ToolRegistry::describe_all`]
pub const NO_TOOLS: &str = "No tools available.";

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, also the keyword the default dispatch looks for
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Run the tool on the raw user message
    async fn execute(&self, input: &str) -> anyhow::Result<String>;
}

type Handler = Arc<dyn Fn(String) -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync>;

/// A tool backed by an async closure
///
/// ```rust,ignore
/// let echo = FnTool::new("echo", "Repeats the message", |input| async move {
///     Ok(input)
/// });
/// ```
#[derive(Clone)]
pub struct FnTool {
    name: String,
    description: String,
    handler: Handler,
}

impl FnTool {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(move |input| handler(input).boxed()),
        }
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        (self.handler)(input.to_string()).await
    }
}

/// Registry for available tools
///
/// Keyed by exact name. Enumeration follows first registration; replacing a
/// tool keeps its original slot.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Overwrites any previous tool with the same name.
    pub fn add(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            info!(tool = %name, "replaced tool");
        } else {
            info!(tool = %name, "registered tool");
            self.order.push(name);
        }
    }

    /// Register a tool, refusing to replace an existing one
    pub fn try_add(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        if self.tools.contains_key(tool.name()) {
            return Err(ShellError::DuplicateTool(tool.name().to_string()));
        }
        self.add(tool);
        Ok(())
    }

    /// Unregister a tool by name. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.tools.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        info!(tool = name, "unregistered tool");
        true
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> + '_ {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// One `"<name>: <description>"` line per tool
    pub fn describe_all(&self) -> String {
        if self.is_empty() {
            return NO_TOOLS.to_string();
        }

        self.iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.order).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, description: &str) -> Arc<dyn Tool> {
        let reply = format!("{name} ran");
        Arc::new(FnTool::new(name, description, move |_| {
            let reply = reply.clone();
            async move { Ok(reply) }
        }))
    }

    #[test]
    fn test_add_and_get() {
        let mut registry = ToolRegistry::new();
        registry.add(tool("weather", "Reports the weather"));
        registry.add(tool("clock", "Tells the time"));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("weather").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.add(tool("weather", "first"));
        registry.add(tool("clock", "Tells the time"));
        registry.add(tool("weather", "second"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("weather").unwrap().description(), "second");
        // replacement keeps the original slot
        assert_eq!(registry.names(), vec!["weather", "clock"]);
    }

    #[test]
    fn test_try_add_rejects_duplicate() {
        let mut registry = ToolRegistry::new();
        registry.try_add(tool("weather", "first")).unwrap();

        let err = registry.try_add(tool("weather", "second")).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateTool(ref name) if name == "weather"));
        assert_eq!(registry.get("weather").unwrap().description(), "first");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = ToolRegistry::new();
        registry.add(tool("weather", "Reports the weather"));

        assert!(registry.remove("weather"));
        assert!(!registry.remove("weather"));
        assert!(registry.get("weather").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_readd_after_remove_moves_to_end() {
        let mut registry = ToolRegistry::new();
        registry.add(tool("a", "A"));
        registry.add(tool("b", "B"));
        registry.remove("a");
        registry.add(tool("a", "A again"));

        assert_eq!(registry.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_describe_all() {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.describe_all(), NO_TOOLS);

        registry.add(tool("weather", "Reports the weather"));
        registry.add(tool("clock", "Tells the time"));
        assert_eq!(
            registry.describe_all(),
            "weather: Reports the weather\nclock: Tells the time"
        );

        registry.remove("weather");
        registry.remove("clock");
        assert_eq!(registry.describe_all(), NO_TOOLS);
    }

    #[tokio::test]
    async fn test_fn_tool_receives_input() {
        let upper = FnTool::new("upper", "Uppercases input", |input: String| async move {
            Ok(input.to_uppercase())
        });
        assert_eq!(upper.execute("shout").await.unwrap(), "SHOUT");
    }

    #[tokio::test]
    async fn test_fn_tool_propagates_failure() {
        let broken = FnTool::new("broken", "Always fails", |_| async move {
            anyhow::bail!("sensor offline")
        });
        let err = broken.execute("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");
    }
}
