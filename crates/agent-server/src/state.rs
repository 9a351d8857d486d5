//! Application State

use std::collections::HashMap;
use std::sync::Arc;

use agent_core::{Agent, LlmProvider, MemorySessionStore, Team};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Groq or any OpenAI-compatible backend)
    pub provider: Arc<dyn LlmProvider>,

    /// Preset agents, keyed by id ("web_search", "finance")
    pub agents: Arc<HashMap<&'static str, Arc<Agent>>>,

    /// Composite team used for dashboard queries
    pub team: Arc<Team>,

    /// Market data source name, for health reporting
    pub market_source: String,

    /// In-memory chat sessions
    pub sessions: Arc<MemorySessionStore>,
}

impl AppState {
    /// Look up an agent by id, falling back to the finance agent.
    pub fn agent(&self, id: Option<&str>) -> Option<Arc<Agent>> {
        let id = id.unwrap_or("finance");
        self.agents.get(id).cloned()
    }
}
