//! Company News Tool

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

const DEFAULT_LIMIT: usize = 5;

/// Tool for fetching recent company news headlines
pub struct CompanyNewsTool {
    market: Arc<dyn MarketDataClient>,
}

impl CompanyNewsTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for CompanyNewsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "company_news".into(),
            description: "Get recent news headlines for a company. Returns headline, source, and link for each story.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "symbol".into(),
                    param_type: "string".into(),
                    description: "Ticker symbol (e.g., 'NVDA')".into(),
                    required: true,
                },
                ParameterSchema {
                    name: "limit".into(),
                    param_type: "number".into(),
                    description: "Maximum number of headlines (default 5)".into(),
                    required: false,
                },
            ],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = call
            .arguments
            .get("symbol")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if symbol.trim().is_empty() {
            return Ok(ToolResult::failure("company_news", "No symbol given"));
        }

        let limit = call
            .arguments
            .get("limit")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_LIMIT, |n| n as usize)
            .max(1);

        let articles = match self.market.news(symbol.trim(), limit).await {
            Ok(articles) => articles,
            Err(e) => return Ok(ToolResult::failure("company_news", e.to_string())),
        };

        if articles.is_empty() {
            return Ok(ToolResult::success(
                "company_news",
                format!("No recent news for {}", symbol.trim().to_uppercase()),
            ));
        }

        let mut output = format!("Latest news for {}:\n", articles[0].symbol);
        for article in &articles {
            output.push_str(&format!("- {} ({})", article.headline, article.source));
            if let Some(url) = &article.url {
                output.push_str(&format!(" — {}", url));
            }
            output.push('\n');
        }

        Ok(ToolResult::success("company_news", output.trim()))
    }
}
