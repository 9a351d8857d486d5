//! Historical Prices Tool

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

const DEFAULT_RANGE: &str = "1mo";

/// Tool for fetching daily closing prices over a range
pub struct HistoricalPricesTool {
    market: Arc<dyn MarketDataClient>,
}

impl HistoricalPricesTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for HistoricalPricesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "historical_prices".into(),
            description:
                "Get daily closing prices for a ticker symbol over a range, as a markdown table with the period change."
                    .into(),
            parameters: vec![
                ParameterSchema {
                    name: "symbol".into(),
                    param_type: "string".into(),
                    description: "Ticker symbol (e.g., 'NVDA')".into(),
                    required: true,
                },
                ParameterSchema {
                    name: "range".into(),
                    param_type: "string".into(),
                    description: "History range: 5d, 1mo, 3mo, 6mo, or 1y (default 1mo)".into(),
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
            .unwrap_or_default()
            .trim()
            .to_string();

        if symbol.is_empty() {
            return Ok(ToolResult::failure("historical_prices", "No symbol given"));
        }

        let range = call
            .arguments
            .get("range")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_RANGE);

        let history = match self.market.price_history(&symbol, range).await {
            Ok(history) => history,
            Err(e) => return Ok(ToolResult::failure("historical_prices", e.to_string())),
        };

        if history.is_empty() {
            return Ok(ToolResult::success(
                "historical_prices",
                format!("No price history for {} over {}", symbol.to_uppercase(), range),
            ));
        }

        let mut output = format!(
            "Closing prices for {} over {}:\n\n| Date | Close |\n|------|-------|\n",
            symbol.to_uppercase(),
            range
        );
        for point in &history {
            output.push_str(&format!(
                "| {} | {:.2} |\n",
                point.date.format("%Y-%m-%d"),
                point.close
            ));
        }

        // Period change, first close to last
        if let (Some(first), Some(last)) = (history.first(), history.last()) {
            if first.close != rust_decimal::Decimal::ZERO {
                let change = (last.close - first.close) / first.close
                    * rust_decimal::Decimal::from(100);
                output.push_str(&format!("\nPeriod change: {:+.2}%\n", change));
            }
        }

        Ok(ToolResult::success("historical_prices", output.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_history_table_and_period_change() {
        let tool = HistoricalPricesTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "historical_prices".into(),
            arguments: HashMap::from([
                ("symbol".into(), serde_json::json!("NVDA")),
                ("range".into(), serde_json::json!("5d")),
            ]),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("Closing prices for NVDA over 5d"));
        assert!(result.output.contains("| Date | Close |"));
        assert!(result.output.contains("Period change: +"));
    }

    #[tokio::test]
    async fn test_history_unknown_symbol_fails() {
        let tool = HistoricalPricesTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "historical_prices".into(),
            arguments: HashMap::from([("symbol".into(), serde_json::json!("NOTREAL"))]),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_history_no_symbol() {
        let tool = HistoricalPricesTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "historical_prices".into(),
            arguments: HashMap::new(),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(!result.success);
    }
}
