//! Stock Quote Tool
//!
//! Fetches current share prices and renders them as a markdown table.

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

/// Tool for looking up stock quotes
pub struct StockQuoteTool {
    market: Arc<dyn MarketDataClient>,
}

impl StockQuoteTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for StockQuoteTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "stock_quote".into(),
            description:
                "Get current stock prices. Returns last price, previous close, percent change, and volume as a markdown table."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "symbols".into(),
                param_type: "string".into(),
                description: "Comma-separated ticker symbols (e.g., 'NVDA,AAPL,TSLA')".into(),
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
            return Ok(ToolResult::failure("stock_quote", "No symbols given"));
        }

        let mut rows = Vec::new();
        let mut errors = Vec::new();

        for symbol in symbols {
            match self.market.quote(symbol).await {
                Ok(quote) => rows.push(format!(
                    "| {} | {} | {:.2} | {:.2} | {:+.2}% | {} |",
                    quote.symbol,
                    quote.name,
                    quote.price,
                    quote.previous_close,
                    quote.change_percent(),
                    quote
                        .volume
                        .map_or_else(|| "-".into(), |v| v.to_string()),
                )),
                Err(e) => errors.push(format!("{}: {}", symbol, e)),
            }
        }

        let mut output = String::new();
        if !rows.is_empty() {
            output.push_str("| Symbol | Name | Price | Prev Close | Change | Volume |\n");
            output.push_str("|--------|------|-------|------------|--------|--------|\n");
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

        Ok(ToolResult::success("stock_quote", output.trim()))
    }
}
