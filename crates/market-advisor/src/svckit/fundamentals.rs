//! Fundamentals Tool

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

/// Tool for fetching company fundamentals
pub struct FundamentalsTool {
    market: Arc<dyn MarketDataClient>,
}

impl FundamentalsTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }

    fn cell(value: Option<Decimal>) -> String {
        value.map_or_else(|| "-".into(), |v| format!("{:.2}", v))
    }
}

#[async_trait]
impl Tool for FundamentalsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "stock_fundamentals".into(),
            description:
                "Get company fundamentals: market cap, P/E ratio, EPS, 52-week range, and dividend yield, as a markdown table."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "symbols".into(),
                param_type: "string".into(),
                description: "Comma-separated ticker symbols (e.g., 'AAPL,GOOG')".into(),
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
            return Ok(ToolResult::failure("stock_fundamentals", "No symbols given"));
        }

        let mut rows = Vec::new();
        let mut errors = Vec::new();

        for symbol in symbols {
            match self.market.fundamentals(symbol).await {
                Ok(f) => rows.push(format!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    f.symbol,
                    Self::cell(f.market_cap),
                    Self::cell(f.pe_ratio),
                    Self::cell(f.eps),
                    Self::cell(f.week52_high),
                    Self::cell(f.week52_low),
                    f.dividend_yield
                        .map_or_else(|| "-".into(), |v| format!("{:.2}%", v)),
                )),
                Err(e) => errors.push(format!("{}: {}", symbol, e)),
            }
        }

        let mut output = String::new();
        if !rows.is_empty() {
            output.push_str(
                "| Symbol | Market Cap | P/E | EPS | 52w High | 52w Low | Div Yield |\n",
            );
            output.push_str(
                "|--------|------------|-----|-----|----------|---------|-----------|\n",
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

        Ok(ToolResult::success("stock_fundamentals", output.trim()))
    }
}
