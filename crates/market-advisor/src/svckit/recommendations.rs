//! Analyst Recommendations Tool

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

/// Tool for fetching analyst recommendation counts
pub struct AnalystRecommendationsTool {
    market: Arc<dyn MarketDataClient>,
}

impl AnalystRecommendationsTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for AnalystRecommendationsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analyst_recommendations".into(),
            description:
                "Get analyst recommendation counts (strong buy through strong sell) and a consensus label, as a markdown table."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "symbols".into(),
                param_type: "string".into(),
                description: "Comma-separated ticker symbols (e.g., 'NVDA,MSFT')".into(),
                required: true,
            }],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbols_str = call
            .arguments
            .get("symbols")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let symbols = super::split_symbols(symbols_str);
        if symbols.is_empty() {
            return Ok(ToolResult::failure(
                "analyst_recommendations",
                "No symbols given",
            ));
        }

        let mut rows = Vec::new();
        let mut errors = Vec::new();

        for symbol in symbols {
            match self.market.recommendations(symbol).await {
                Ok(recs) => rows.push(format!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    recs.symbol,
                    recs.strong_buy,
                    recs.buy,
                    recs.hold,
                    recs.sell,
                    recs.strong_sell,
                    recs.consensus(),
                )),
                Err(e) => errors.push(format!("{}: {}", symbol, e)),
            }
        }

        let mut output = String::new();
        if !rows.is_empty() {
            output.push_str(
                "| Symbol | Strong Buy | Buy | Hold | Sell | Strong Sell | Consensus |\n",
            );
            output.push_str(
                "|--------|------------|-----|------|------|-------------|-----------|\n",
            );
            for row in &rows {
                output.push_str(row);
                output.push('\n');
            }
        }

        if !errors.is_empty() {
            output.push_str("\nUnavailable:\n");
            for error in &errors {
                output.push_str(&format!("  {}\n", error));
            }
        }

        Ok(ToolResult::success("analyst_recommendations", output.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_recommendations_table() {
        let tool = AnalystRecommendationsTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "analyst_recommendations".into(),
            arguments: HashMap::from([("symbols".into(), serde_json::json!("NVDA"))]),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("| Consensus |"));
        assert!(result.output.contains("| NVDA |"));
        assert!(result.output.contains("Buy"));
    }
}
