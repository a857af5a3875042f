//! agentshell HTTP Server
//!
//! Axum-based server hosting a single agent conversation with a couple of
//! built-in tools and an Ollama-backed model provider.

mod config;
mod handlers;
mod state;
mod tools;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentshell_core::{AgentShell, ModelProvider};
use agentshell_runtime::OllamaProvider;

use crate::config::ServerConfig;
use crate::handlers::{chat_handler, clear_history, get_history, health_check, list_tools};
use crate::state::AppState;
use crate::tools::{CalculatorTool, DateTimeTool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize model provider
    let provider: Arc<dyn ModelProvider> =
        Arc::new(OllamaProvider::from_config(config.ollama.clone())?);

    match provider.health_check().await {
        Ok(true) => tracing::info!("Connected to Ollama at {}", config.ollama.base_url()),
        Ok(false) | Err(_) => {
            tracing::warn!("Ollama not reachable at {}", config.ollama.base_url());
            tracing::warn!("  Chat replies will carry the provider error until it is up");
        }
    }

    // Assemble the shell
    let shell = AgentShell::builder()
        .identity(config.identity.clone())
        .config(config.shell.clone())
        .tool(Arc::new(DateTimeTool))
        .tool(Arc::new(CalculatorTool))
        .provider(provider.clone())
        .build()?;
    shell.announce();

    let state = AppState::new(shell, provider);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .route("/api/tools", get(list_tools))
        .route("/api/history", get(get_history).delete(clear_history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("agentshell server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health       - Health check");
    tracing::info!("  POST   /api/chat     - Send message");
    tracing::info!("  GET    /api/tools    - Registered tools");
    tracing::info!("  GET    /api/history  - Conversation summary and turns");
    tracing::info!("  DELETE /api/history  - Clear conversation");

    axum::serve(listener, app).await?;

    Ok(())
}
