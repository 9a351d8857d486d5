//! Mock Market Data Client
//!
//! For testing and demo mode. Returns realistic static data so the agents and
//! dashboard work without network access or API keys.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataClient;
use crate::error::{AdvisorError, Result};
use crate::model::{CompanyProfile, Fundamentals, NewsArticle, PricePoint, Quote, Recommendations};

/// Mock market data client with static quotes
pub struct MockMarketClient;

impl Default for MockMarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketClient {
    pub fn new() -> Self {
        Self
    }

    /// (price, previous_close, name, volume)
    fn base_quote(symbol: &str) -> Option<(Decimal, Decimal, &'static str, u64)> {
        match symbol.to_uppercase().as_str() {
            "AAPL" => Some((dec!(232.15), dec!(229.80), "Apple Inc.", 48_200_000)),
            "MSFT" => Some((dec!(428.90), dec!(431.20), "Microsoft Corporation", 19_600_000)),
            "GOOG" => Some((dec!(178.35), dec!(176.10), "Alphabet Inc.", 21_400_000)),
            "AMZN" => Some((dec!(186.40), dec!(184.95), "Amazon.com, Inc.", 35_800_000)),
            "NVDA" => Some((dec!(132.40), dec!(128.75), "NVIDIA Corporation", 312_500_000)),
            "META" => Some((dec!(563.20), dec!(559.40), "Meta Platforms, Inc.", 12_100_000)),
            "TSLA" => Some((dec!(248.50), dec!(255.30), "Tesla, Inc.", 88_300_000)),
            _ => None,
        }
    }

    fn base_recommendations(symbol: &str) -> Option<Recommendations> {
        let (strong_buy, buy, hold, sell, strong_sell) = match symbol.to_uppercase().as_str() {
            "AAPL" => (10, 21, 12, 1, 1),
            "MSFT" => (15, 28, 4, 0, 0),
            "GOOG" => (13, 24, 9, 0, 0),
            "AMZN" => (17, 27, 3, 0, 0),
            "NVDA" => (12, 34, 4, 0, 0),
            "META" => (11, 29, 6, 1, 0),
            "TSLA" => (6, 13, 17, 7, 3),
            _ => return None,
        };

        Some(Recommendations {
            symbol: symbol.to_uppercase(),
            strong_buy,
            buy,
            hold,
            sell,
            strong_sell,
        })
    }

    /// (sector, industry)
    fn base_profile(symbol: &str) -> Option<(&'static str, &'static str)> {
        match symbol.to_uppercase().as_str() {
            "AAPL" => Some(("Technology", "Consumer Electronics")),
            "MSFT" => Some(("Technology", "Software - Infrastructure")),
            "GOOG" | "META" => Some(("Communication Services", "Internet Content & Information")),
            "AMZN" => Some(("Consumer Cyclical", "Internet Retail")),
            "NVDA" => Some(("Technology", "Semiconductors")),
            "TSLA" => Some(("Consumer Cyclical", "Auto Manufacturers")),
            _ => None,
        }
    }

    /// Trading days covered by a chart range string
    fn range_days(range: &str) -> usize {
        match range {
            "5d" => 5,
            "3mo" => 63,
            "6mo" => 126,
            "1y" => 252,
            _ => 21, // "1mo" and anything unrecognized
        }
    }

    fn base_headlines(symbol: &str) -> Option<Vec<&'static str>> {
        match symbol.to_uppercase().as_str() {
            "AAPL" => Some(vec![
                "Apple reported stronger than expected services revenue",
                "Apple expands its AI features to older iPhone models",
            ]),
            "NVDA" => Some(vec![
                "NVIDIA data center revenue hits another record quarter",
                "NVIDIA announces next-generation GPU architecture",
                "Analysts raise NVIDIA price targets after earnings beat",
            ]),
            "GOOG" => Some(vec![
                "Google announced a new product line for enterprise search",
                "Alphabet cloud division posts accelerating growth",
            ]),
            "TSLA" => Some(vec![
                "Tesla deliveries miss estimates for the quarter",
                "Tesla cuts prices across its lineup in key markets",
            ]),
            "MSFT" | "AMZN" | "META" => Some(vec![
                "Company posts quarterly results ahead of consensus",
            ]),
            _ => None,
        }
    }
}

#[async_trait]
impl MarketDataClient for MockMarketClient {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let (price, previous_close, name, volume) = Self::base_quote(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        let mut quote = Quote::new(symbol, name, price);
        quote.previous_close = previous_close;
        quote.volume = Some(volume);
        quote.updated_at = Utc::now();

        Ok(quote)
    }

    async fn recommendations(&self, symbol: &str) -> Result<Recommendations> {
        Self::base_recommendations(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let (price, _, _, _) = Self::base_quote(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        // Static but plausible ratios derived from the quote
        Ok(Fundamentals {
            symbol: symbol.to_uppercase(),
            market_cap: Some(price * dec!(10_000_000_000)),
            pe_ratio: Some(dec!(31.5)),
            eps: Some(price / dec!(31.5)),
            week52_high: Some(price * dec!(1.18)),
            week52_low: Some(price * dec!(0.62)),
            dividend_yield: Some(dec!(0.5)),
        })
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyProfile> {
        let (_, _, name, _) = Self::base_quote(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;
        let (sector, industry) = Self::base_profile(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        Ok(CompanyProfile {
            symbol: symbol.to_uppercase(),
            sector: Some(sector.into()),
            industry: Some(industry.into()),
            website: Some(format!(
                "https://www.{}.example.com",
                symbol.to_lowercase()
            )),
            employees: Some(100_000),
            summary: Some(format!("{} operates in the {} industry.", name, industry)),
        })
    }

    async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<PricePoint>> {
        let (price, previous_close, _, _) = Self::base_quote(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        // Linear walk from the previous close up to today's price
        let days = Self::range_days(range);
        let step = (price - previous_close) / Decimal::from(days as u64);
        let today = Utc::now();

        Ok((0..days)
            .map(|i| PricePoint {
                date: today - chrono::Duration::days((days - 1 - i) as i64),
                close: previous_close + step * Decimal::from(i as u64 + 1),
            })
            .collect())
    }

    async fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let headlines = Self::base_headlines(symbol)
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        Ok(headlines
            .into_iter()
            .take(limit)
            .map(|headline| NewsArticle {
                symbol: symbol.to_uppercase(),
                headline: headline.into(),
                source: "MockWire".into(),
                url: None,
                published_at: Some(Utc::now()),
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_quote() {
        let market = MockMarketClient::new();

        let nvda = market.quote("nvda").await.unwrap();
        assert_eq!(nvda.symbol, "NVDA");
        assert!(nvda.price > Decimal::ZERO);
        assert!(nvda.change_percent() > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unsupported_symbol() {
        let market = MockMarketClient::new();
        assert!(market.quote("NOTREAL").await.is_err());
        assert!(market.news("NOTREAL", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_news_limit() {
        let market = MockMarketClient::new();
        let news = market.news("NVDA", 2).await.unwrap();
        assert_eq!(news.len(), 2);
    }

    #[tokio::test]
    async fn test_multi_quote_skips_failures() {
        let market = MockMarketClient::new();
        let quotes = market.quotes(&["AAPL", "NOTREAL", "NVDA"]).await.unwrap();
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn test_company_info() {
        let market = MockMarketClient::new();
        let profile = market.company_info("nvda").await.unwrap();
        assert_eq!(profile.symbol, "NVDA");
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert!(market.company_info("NOTREAL").await.is_err());
    }

    #[tokio::test]
    async fn test_price_history_ends_at_quote() {
        let market = MockMarketClient::new();
        let history = market.price_history("NVDA", "5d").await.unwrap();
        let quote = market.quote("NVDA").await.unwrap();

        assert_eq!(history.len(), 5);
        assert_eq!(history.last().map(|p| p.close), Some(quote.price));
        assert!(history[0].date < history[4].date);
    }
}
