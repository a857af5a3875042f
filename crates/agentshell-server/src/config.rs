//! Server Configuration
//!
//! Read from the process environment (after `.env` is loaded).
//!
//! | variable | default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `AGENT_NAME` | `Assistant` |
//! | `AGENT_DESCRIPTION` | `General purpose assistant` |
//! | `AGENT_VERSION` | crate version |
//! | `AGENT_AUTHOR` | `unknown` |
//! | `SUMMARY_WINDOW` | `5` |
//! | `DUPLICATE_TOOLS` | `replace` (`reject` for strict registration) |
//! | `SYSTEM_PROMPT` | unset |
//! | `OLLAMA_HOST` / `OLLAMA_PORT` / `OLLAMA_MODEL` | see `OllamaConfig` |

use agentshell_core::{AgentIdentity, DuplicatePolicy, Result, ShellConfig, ShellError};
use agentshell_runtime::OllamaConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub identity: AgentIdentity,
    pub shell: ShellConfig,
    pub ollama: OllamaConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.ollama = OllamaConfig::from_env();
        if let Some(model) = &config.ollama.model {
            config.shell.generation.model.clone_from(model);
        }
        Ok(config)
    }

    /// Build from an arbitrary key lookup; Ollama settings keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let identity = AgentIdentity::new(
            var("AGENT_NAME", "Assistant"),
            var("AGENT_DESCRIPTION", "General purpose assistant"),
            var("AGENT_VERSION", env!("CARGO_PKG_VERSION")),
            var("AGENT_AUTHOR", "unknown"),
        );

        let mut shell = ShellConfig::default();
        if let Some(raw) = lookup("SUMMARY_WINDOW") {
            shell.summary_window = raw
                .parse()
                .map_err(|_| ShellError::Config(format!("SUMMARY_WINDOW is not a number: {raw}")))?;
        }
        if let Some(raw) = lookup("DUPLICATE_TOOLS") {
            shell.duplicate_tools = match raw.to_lowercase().as_str() {
                "replace" => DuplicatePolicy::Replace,
                "reject" => DuplicatePolicy::Reject,
                other => {
                    return Err(ShellError::Config(format!(
                        "DUPLICATE_TOOLS must be 'replace' or 'reject', got '{other}'"
                    )));
                }
            };
        }
        shell.generation.system_prompt = lookup("SYSTEM_PROMPT").filter(|p| !p.is_empty());
        shell.validate()?;

        Ok(Self {
            bind_addr: var("BIND_ADDR", "0.0.0.0:3000"),
            identity,
            shell,
            ollama: OllamaConfig::default(),
        })
    }
}
