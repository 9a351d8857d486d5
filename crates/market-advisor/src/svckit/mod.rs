//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the market
//! advisor. The finance tools render markdown tables so agent replies can
//! surface the data directly.

mod company_info;
mod company_news;
mod fundamentals;
mod price_history;
mod recommendations;
mod stock_quote;
mod web_search;

pub use company_info::CompanyInfoTool;
pub use company_news::CompanyNewsTool;
pub use fundamentals::FundamentalsTool;
pub use price_history::HistoricalPricesTool;
pub use recommendations::AnalystRecommendationsTool;
pub use stock_quote::StockQuoteTool;
pub use web_search::WebSearchTool;

/// Parse a comma-separated symbol argument into trimmed, non-empty entries.
fn split_symbols(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
