//! HTTP/WebSocket Handlers

use axum::{
    Json,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{
    Message as ChatMessage, Session, SessionId, SessionStore, provider::GenerationOptions,
};
use market_advisor::segment::{TableData, segment};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub market_source: String,
}

#[derive(Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Agent id; defaults to the finance agent
    #[serde(default)]
    pub agent: Option<String>,
    /// Resume an existing session
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub agent: String,
    pub model: String,
    pub session_id: String,
    pub tool_calls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// "team" (default), or an agent id to query a single specialist
    #[serde(default)]
    pub agent: Option<String>,
}

/// The segmented reply the dashboard renders region by region.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub agent: String,
    pub model: String,
    pub news: Vec<String>,
    pub table: Option<TableData>,
    pub notes: String,
    pub tool_calls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn agent_error(e: &agent_core::AgentError) -> ApiError {
    tracing::error!("Agent error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.user_message(),
            code: "AGENT_ERROR".into(),
        }),
    )
}

fn unknown_agent(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Unknown agent: {}", id),
            code: "UNKNOWN_AGENT".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        market_source: state.market_source.clone(),
    })
}

/// List available agents and their toolsets
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    let mut summaries: Vec<AgentSummary> = state
        .agents
        .iter()
        .map(|(id, agent)| AgentSummary {
            id: (*id).to_string(),
            name: agent.name().to_string(),
            role: agent.config().role.clone(),
            tools: agent
                .tools()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
        })
        .collect();

    summaries.push(AgentSummary {
        id: "team".into(),
        name: state.team.name().to_string(),
        role: Some("Coordinates the specialist agents".into()),
        tools: state
            .team
            .member_names()
            .into_iter()
            .map(String::from)
            .collect(),
    });

    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    Json(summaries)
}

/// Main chat endpoint (non-streaming, session-aware)
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let agent_id = payload.agent.as_deref().unwrap_or("finance");
    let agent = state
        .agent(Some(agent_id))
        .ok_or_else(|| unknown_agent(agent_id))?;

    // Resume the session if the client sent an id, otherwise start fresh
    let mut session = match &payload.session_id {
        Some(id) => {
            let id = SessionId::from_string(id.clone());
            state
                .sessions
                .load(&id)
                .map_err(|e| agent_error(&e))?
                .unwrap_or_else(|| Session::with_id(id, agent_id))
        }
        None => Session::new(agent_id),
    };

    session
        .conversation
        .push(ChatMessage::user(&payload.message));

    let response = agent
        .run(&mut session.conversation)
        .await
        .map_err(|e| agent_error(&e))?;

    session.touch();
    state.sessions.save(&session).map_err(|e| agent_error(&e))?;

    Ok(Json(ChatResponse {
        message: response.display_text(),
        agent: response.agent,
        model: response.model,
        session_id: session.id.to_string(),
        tool_calls: response.tool_calls,
    }))
}

/// Dashboard query endpoint: run the team (or one agent), then split the
/// reply into news, table, and notes regions.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let response = match payload.agent.as_deref() {
        None | Some("team") => state
            .team
            .respond(&payload.query)
            .await
            .map_err(|e| agent_error(&e))?,
        Some(id) => {
            let agent = state.agent(Some(id)).ok_or_else(|| unknown_agent(id))?;
            agent
                .ask(&payload.query)
                .await
                .map_err(|e| agent_error(&e))?
        }
    };

    let segmentation = segment(&response.display_text());

    Ok(Json(QueryResponse {
        agent: response.agent,
        model: response.model,
        news: segmentation.news,
        table: segmentation.table,
        notes: segmentation.notes,
        tool_calls: response.tool_calls,
    }))
}

/// WebSocket streaming chat
pub async fn chat_stream_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        let request: ChatRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        // Streaming bypasses the tool loop: stream straight completions
        // using the selected agent's system prompt.
        let Some(agent) = state.agent(request.agent.as_deref()) else {
            let error = serde_json::json!({"type": "error", "error": "unknown agent"});
            let _ = sender.send(Message::Text(error.to_string().into())).await;
            continue;
        };

        let messages = vec![
            ChatMessage::system(agent.build_system_prompt()),
            ChatMessage::user(&request.message),
        ];
        let options = GenerationOptions::default();

        match state.provider.complete_stream(&messages, &options).await {
            Ok(mut stream) => {
                while let Some(result) = stream.next().await {
                    match result {
                        Ok(chunk) => {
                            let response = serde_json::json!({
                                "type": "chunk",
                                "content": chunk.delta,
                                "done": chunk.done,
                            });
                            if sender
                                .send(Message::Text(response.to_string().into()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        Err(e) => {
                            let error =
                                serde_json::json!({"type": "error", "error": e.to_string()});
                            let _ = sender.send(Message::Text(error.to_string().into())).await;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
            }
        }
    }
}
