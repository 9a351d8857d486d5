//! Web Search Tool
//!
//! Searches DuckDuckGo's lite endpoint and returns organic results. No API
//! key required. Results carry title, URL, and snippet so agents can cite
//! their sources.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::error::{AdvisorError, Result};

const DEFAULT_BASE_URL: &str = "https://lite.duckduckgo.com/lite/";
const MAX_RESULTS: usize = 10;
const TIMEOUT_SECONDS: u64 = 10;

/// A single organic search result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Tool for searching the web via DuckDuckGo lite
pub struct WebSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AdvisorError::Search(format!(
                "search request failed with status {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let results = Self::parse_results(&html)?;
        tracing::debug!(query, count = results.len(), "web search complete");
        Ok(results)
    }

    /// Parse the lite endpoint's table layout: result links alternate with
    /// snippet cells.
    fn parse_results(html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        let link_selector = Selector::parse("a.result-link")
            .map_err(|e| AdvisorError::Search(format!("invalid selector: {e:?}")))?;
        let snippet_selector = Selector::parse("td.result-snippet")
            .map_err(|e| AdvisorError::Search(format!("invalid selector: {e:?}")))?;

        let links: Vec<_> = document.select(&link_selector).collect();
        let snippets: Vec<_> = document.select(&snippet_selector).collect();

        let mut results = Vec::new();
        for (i, link) in links.iter().take(MAX_RESULTS).enumerate() {
            let Some(href) = link.value().attr("href") else {
                continue;
            };

            let title = link.text().collect::<Vec<_>>().join(" ");
            let snippet = snippets
                .get(i)
                .map(|s| Self::clean_text(&s.text().collect::<Vec<_>>().join(" ")))
                .unwrap_or_default();

            results.push(SearchResult {
                title: Self::clean_text(&title),
                url: Self::decode_url(href),
                snippet,
            });
        }

        Ok(results)
    }

    /// Unwrap DuckDuckGo redirect URLs of the form
    /// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com`.
    fn decode_url(url: &str) -> String {
        if url.contains("uddg=") {
            url.split("uddg=")
                .nth(1)
                .and_then(|s| s.split('&').next())
                .map(|s| urlencoding::decode(s).unwrap_or_default().to_string())
                .unwrap_or_else(|| url.to_string())
        } else {
            url.to_string()
        }
    }

    /// Collapse whitespace and decode the entities the lite endpoint emits.
    fn clean_text(text: &str) -> String {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        text.replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the web using DuckDuckGo. Returns organic results with title, URL, and snippet so sources can be cited.".into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "The search query".into(),
                required: true,
            }],
            category: Some("research".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if query.trim().is_empty() {
            return Ok(ToolResult::failure("web_search", "Empty search query"));
        }

        let results = match self.search(query.trim()).await {
            Ok(results) => results,
            Err(e) => return Ok(ToolResult::failure("web_search", e.to_string())),
        };

        if results.is_empty() {
            return Ok(ToolResult::success("web_search", "No results found"));
        }

        let mut output = String::new();
        for result in &results {
            output.push_str(&format!(
                "- {} — {}\n  {}\n",
                result.title, result.url, result.snippet
            ));
        }

        Ok(ToolResult::success("web_search", output.trim()))
    }
}
