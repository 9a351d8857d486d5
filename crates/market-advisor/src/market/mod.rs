//! Market Data Integration
//!
//! Abstractions and implementations for equity market data sources.

mod mock;
mod yahoo;

pub use mock::MockMarketClient;
pub use yahoo::YahooMarketClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CompanyProfile, Fundamentals, NewsArticle, PricePoint, Quote, Recommendations};

/// Market data client trait (Strategy pattern)
///
/// Implement this for each data source: Yahoo, Polygon, Alpha Vantage, etc.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Get the current quote for a symbol
    async fn quote(&self, symbol: &str) -> Result<Quote>;

    /// Get quotes for multiple symbols (symbols that fail are skipped)
    async fn quotes(&self, symbols: &[&str]) -> Result<Vec<Quote>> {
        let mut quotes = Vec::new();
        for symbol in symbols {
            if let Ok(quote) = self.quote(symbol).await {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }

    /// Get analyst recommendation counts
    async fn recommendations(&self, symbol: &str) -> Result<Recommendations>;

    /// Get company fundamentals
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals>;

    /// Get the company profile (sector, industry, website, summary)
    async fn company_info(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Get daily closing prices over a range (e.g. "5d", "1mo", "1y")
    async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<PricePoint>>;

    /// Get recent company news headlines
    async fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>>;

    /// Check if the data source is available
    async fn health_check(&self) -> bool;

    /// Data source name
    fn name(&self) -> &str;
}
