//! Tool Dispatch
//!
//! Decides whether an incoming message is handled by a registered tool or
//! forwarded to the model provider. The shell only talks to the
//! [`DispatchPolicy`] trait, so keyword matching can be swapped for intent
//! classification without touching the chat flow.

use std::sync::Arc;

use crate::tool::{Tool, ToolRegistry};

/// Strategy trait for tool selection
pub trait DispatchPolicy: Send + Sync {
    /// Pick the tool that should answer `message`, if any
    fn select(&self, message: &str, registry: &ToolRegistry) -> Option<Arc<dyn Tool>>;
}

/// Default policy: first tool (registration order) whose name appears in the
/// message, ignoring case
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordPolicy;

impl KeywordPolicy {
    /// Case-insensitive substring test
    pub fn matches(message: &str, tool: &dyn Tool) -> bool {
        message.to_lowercase().contains(&tool.name().to_lowercase())
    }
}

impl DispatchPolicy for KeywordPolicy {
    fn select(&self, message: &str, registry: &ToolRegistry) -> Option<Arc<dyn Tool>> {
        registry
            .iter()
            .find(|&tool| Self::matches(message, tool.as_ref()))
            .cloned()
    }
}

/// First-match policy driven by a caller-supplied predicate
pub struct PredicatePolicy<F> {
    predicate: F,
}

impl<F> PredicatePolicy<F>
where
    F: Fn(&str, &dyn Tool) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> DispatchPolicy for PredicatePolicy<F>
where
    F: Fn(&str, &dyn Tool) -> bool + Send + Sync,
{
    fn select(&self, message: &str, registry: &ToolRegistry) -> Option<Arc<dyn Tool>> {
        registry
            .iter()
            .find(|&tool| (self.predicate)(message, tool.as_ref()))
            .cloned()
    }
}

/// Never short-circuits; every message goes to the provider
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverDispatch;

impl DispatchPolicy for NeverDispatch {
    fn select(&self, _message: &str, _registry: &ToolRegistry) -> Option<Arc<dyn Tool>> {
        None
    }
}
