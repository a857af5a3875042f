//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use agentshell_core::{AgentIdentity, ShellError, ShellState, Turn};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub agent: AgentIdentity,
    pub state: ShellState,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub turns: usize,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub description: String,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub summary: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &ShellError) -> ApiError {
    let status = match err {
        ShellError::NotInitialized => StatusCode::CONFLICT,
        e if e.is_misuse() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);
    let shell = state.shell.lock().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        agent: shell.identity().clone(),
        state: shell.state(),
        provider: state.provider.name().to_string(),
        provider_connected,
    })
}

/// Run one chat turn
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty".into(),
                code: "EMPTY_MESSAGE".into(),
            }),
        ));
    }

    let mut shell = state.shell.lock().await;
    let reply = shell.chat(&payload.message).await.map_err(|e| {
        tracing::error!("Chat error: {}", e);
        api_error(&e)
    })?;

    Ok(Json(ChatResponse {
        reply,
        turns: shell.history().len(),
    }))
}

/// Registered tools
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    let shell = state.shell.lock().await;
    Json(ToolsResponse {
        description: shell.tools_description(),
        names: shell.tools().names().into_iter().map(String::from).collect(),
    })
}

/// Conversation summary and full turn list
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let shell = state.shell.lock().await;
    Json(HistoryResponse {
        summary: shell.conversation_summary(),
        turns: shell.history().turns().to_vec(),
    })
}

/// Forget the conversation
pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.shell.lock().await.clear_history();
    tracing::info!("conversation cleared");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use agentshell_core::provider::mock::{FailingProvider, ScriptedProvider};
    use agentshell_core::{AgentShell, ModelProvider};

    use crate::tools::CalculatorTool;

    fn state_with(provider: Arc<dyn ModelProvider>, bind: bool) -> AppState {
        let mut shell = AgentShell::builder()
            .name("Tester")
            .tool(Arc::new(CalculatorTool))
            .build()
            .unwrap();
        if bind {
            shell.initialize(provider.clone());
        }
        AppState::new(shell, provider)
    }

    fn chat(message: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            message: message.into(),
        })
    }

    #[tokio::test]
    async fn test_chat_uses_tool() {
        let state = state_with(Arc::new(ScriptedProvider::new()), true);

        let Json(response) = chat_handler(State(state), chat("calculate 6 * 7"))
            .await
            .unwrap();
        assert_eq!(response.reply, "Tool 'calculate' executed: 6 * 7 = 42");
        assert_eq!(response.turns, 2);
    }

    #[tokio::test]
    async fn test_chat_forwards_to_provider() {
        let state = state_with(Arc::new(ScriptedProvider::with_replies(["Hello!"])), true);

        let Json(response) = chat_handler(State(state), chat("hi")).await.unwrap();
        assert_eq!(response.reply, "Hello!");
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_still_ok() {
        let state = state_with(Arc::new(FailingProvider::new("timeout")), true);

        let Json(response) = chat_handler(State(state), chat("hi")).await.unwrap();
        assert_eq!(response.reply, "Error processing message: timeout");
    }

    #[tokio::test]
    async fn test_chat_uninitialized_is_conflict() {
        let state = state_with(Arc::new(ScriptedProvider::new()), false);

        let (status, Json(body)) = chat_handler(State(state.clone()), chat("hi"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "NOT_INITIALIZED");
        assert!(state.shell.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let state = state_with(Arc::new(ScriptedProvider::new()), true);

        let (status, _) = chat_handler(State(state), chat("   ")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tools_and_history() {
        let state = state_with(Arc::new(ScriptedProvider::new()), true);

        let Json(tools) = list_tools(State(state.clone())).await;
        assert_eq!(tools.names, vec!["calculate"]);
        assert!(tools.description.starts_with("calculate: "));

        chat_handler(State(state.clone()), chat("hi")).await.unwrap();
        let Json(history) = get_history(State(state.clone())).await;
        assert_eq!(history.turns.len(), 2);
        assert!(history.summary.starts_with("Conversation with Tester (2 messages):"));

        assert_eq!(clear_history(State(state.clone())).await, StatusCode::NO_CONTENT);
        let Json(history) = get_history(State(state)).await;
        assert!(history.turns.is_empty());
        assert_eq!(history.summary, "No conversation history.");
    }

    #[tokio::test]
    async fn test_health() {
        let state = state_with(Arc::new(FailingProvider::new("down")), true);

        let Json(health) = health_check(State(state)).await;
        assert_eq!(health.agent.name, "Tester");
        assert_eq!(health.state, ShellState::Ready);
        assert!(!health.provider_connected);
    }
}
