//! market-pulse HTTP Server
//!
//! Axum-based playground server: REST endpoints for chat and dashboard
//! queries, WebSocket streaming, and static hosting for the WASM frontend.

mod handlers;
mod state;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{Agent, LlmProvider, MemorySessionStore};
use agent_runtime::OpenAiCompatProvider;
use market_advisor::{
    agents::{finance_agent, market_team, web_search_agent},
    market::{MarketDataClient, MockMarketClient, YahooMarketClient},
};

use crate::handlers::{
    chat_handler, chat_stream_handler, health_check, list_agents, query_handler,
};
use crate::state::AppState;

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

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatProvider::groq_from_env()?);

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to model backend");
            if let Ok(models) = provider.list_models().await {
                for model in models.iter().take(10) {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Model backend not reachable - agents will fail");
            tracing::warn!("  Check GROQ_API_KEY in .env");
        }
    }

    // Market data source: mock by default, Yahoo when requested
    let market: Arc<dyn MarketDataClient> =
        match std::env::var("MARKET_DATA").as_deref() {
            Ok("yahoo") => Arc::new(YahooMarketClient::new()),
            _ => Arc::new(MockMarketClient::new()),
        };
    let market_source = market.name().to_string();
    tracing::info!("Market data source: {}", market_source);

    // Build the preset agents and the team
    let search = Arc::new(web_search_agent(Arc::clone(&provider))?);
    let finance = Arc::new(finance_agent(Arc::clone(&provider), Arc::clone(&market))?);
    let team = Arc::new(market_team(Arc::clone(&provider), Arc::clone(&market))?);

    let agents: HashMap<&'static str, Arc<Agent>> =
        HashMap::from([("web_search", search), ("finance", finance)]);

    for (id, agent) in &agents {
        tracing::info!("Agent '{}' ({}): {} tools", id, agent.name(), agent.tools().len());
    }

    let state = AppState {
        provider,
        agents: Arc::new(agents),
        team,
        market_source,
        sessions: Arc::new(MemorySessionStore::new()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/agents", get(list_agents))
        // Agent API
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        // Dashboard API (segmented replies)
        .route("/api/query", post(query_handler))
        // Static files (WASM frontend)
        .nest_service("/", tower_http::services::ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 market-pulse server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/agents      - List agents and tools");
    tracing::info!("  POST /api/chat        - Send message (session-aware)");
    tracing::info!("  GET  /api/chat/stream - WebSocket streaming");
    tracing::info!("  POST /api/query       - Dashboard query (segmented)");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
