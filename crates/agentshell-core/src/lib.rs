//! # agentshell-core
//!
//! A minimal conversational agent shell: a registry of named tools, a rolling
//! conversation log, and a call-through to an external model provider.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         AgentShell                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │ Conversation │  │  Dispatch    │──│   ToolRegistry     │  │
//! │  │     Log      │  │  Policy      │  └────────────────────┘  │
//! │  └──────────────┘  └──────────────┘  ┌────────────────────┐  │
//! │                                      │  ModelProvider     │  │
//! │                                      │  (Strategy)        │  │
//! │                                      └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A user message is recorded, offered to the `DispatchPolicy`; a matching
//! tool answers directly, otherwise the full log goes to the provider.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod provider;
pub mod shell;
pub mod tool;

pub use config::{DuplicatePolicy, ShellConfig};
pub use dispatch::{DispatchPolicy, KeywordPolicy, NeverDispatch, PredicatePolicy};
pub use error::{Result, ShellError};
pub use message::{ConversationLog, Role, Turn};
pub use provider::{Generation, GenerationOptions, ModelProvider};
pub use shell::{AgentIdentity, AgentShell, AgentShellBuilder, ShellState};
pub use tool::{FnTool, Tool, ToolRegistry};
