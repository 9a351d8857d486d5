//! API Client
//!
//! Thin wrappers over the playground server's JSON endpoints, with mirror
//! types for the payloads the dashboard consumes.

use serde::{Deserialize, Serialize};

/// A parsed table, as returned by the query endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Segmented reply from `/api/query`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryView {
    pub agent: String,
    pub model: String,
    pub news: Vec<String>,
    pub table: Option<TableView>,
    pub notes: String,
    #[serde(default)]
    pub tool_calls: Vec<String>,
}

/// One entry from `/api/agents`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Origin of the page the dashboard is served from
fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// Run a dashboard query against the team (or a single agent).
pub async fn run_query(query: &str, agent: Option<&str>) -> Result<QueryView, String> {
    let client = reqwest::Client::new();

    let mut body = serde_json::json!({ "query": query });
    if let Some(agent) = agent {
        body["agent"] = serde_json::json!(agent);
    }

    let response = client
        .post(format!("{}/api/query", api_base()))
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json::<QueryView>().await.map_err(|e| e.to_string())
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"]
            .as_str()
            .unwrap_or("Request failed")
            .to_string())
    }
}

/// Fetch the agent roster for the selector.
pub async fn fetch_agents() -> Result<Vec<AgentView>, String> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/agents", api_base()))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response
            .json::<Vec<AgentView>>()
            .await
            .map_err(|e| e.to_string())
    } else {
        Err("Failed to load agents".into())
    }
}
