//! Company Info Tool

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::market::MarketDataClient;

/// Tool for fetching company profiles
pub struct CompanyInfoTool {
    market: Arc<dyn MarketDataClient>,
}

impl CompanyInfoTool {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for CompanyInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "company_info".into(),
            description:
                "Get the company profile for ticker symbols: sector, industry, website, employee count, and a business summary."
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
            return Ok(ToolResult::failure("company_info", "No symbols given"));
        }

        let mut output = String::new();
        let mut errors = Vec::new();

        for symbol in symbols {
            match self.market.company_info(symbol).await {
                Ok(profile) => {
                    output.push_str(&format!("## {}\n", profile.symbol));
                    if let Some(sector) = &profile.sector {
                        output.push_str(&format!("Sector: {}\n", sector));
                    }
                    if let Some(industry) = &profile.industry {
                        output.push_str(&format!("Industry: {}\n", industry));
                    }
                    if let Some(website) = &profile.website {
                        output.push_str(&format!("Website: {}\n", website));
                    }
                    if let Some(employees) = profile.employees {
                        output.push_str(&format!("Employees: {}\n", employees));
                    }
                    if let Some(summary) = &profile.summary {
                        output.push_str(&format!("\n{}\n", summary));
                    }
                    output.push('\n');
                }
                Err(e) => errors.push(format!("{}: {}", symbol, e)),
            }
        }

        if !errors.is_empty() {
            output.push_str("Unavailable:\n");
            for error in &errors {
                output.push_str(&format!("  {}\n", error));
            }
        }

        Ok(ToolResult::success("company_info", output.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_company_info_sections() {
        let tool = CompanyInfoTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "company_info".into(),
            arguments: HashMap::from([("symbols".into(), serde_json::json!("NVDA,AAPL"))]),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("## NVDA"));
        assert!(result.output.contains("Sector: Technology"));
        assert!(result.output.contains("## AAPL"));
    }

    #[tokio::test]
    async fn test_company_info_no_symbols() {
        let tool = CompanyInfoTool::new(Arc::new(MockMarketClient::new()));
        let call = ToolCall {
            name: "company_info".into(),
            arguments: HashMap::new(),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(!result.success);
    }
}
