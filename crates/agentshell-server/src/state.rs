//! Application State

use std::sync::Arc;

use agentshell_core::{AgentShell, ModelProvider};
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The one conversation this server hosts. Chat turns are serialized
    /// through the mutex.
    pub shell: Arc<Mutex<AgentShell>>,

    /// Provider bound into the shell, kept for health checks
    pub provider: Arc<dyn ModelProvider>,
}

impl AppState {
    pub fn new(shell: AgentShell, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            shell: Arc::new(Mutex::new(shell)),
            provider,
        }
    }
}
