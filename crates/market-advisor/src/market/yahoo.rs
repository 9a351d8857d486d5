//! Yahoo Finance Client
//!
//! Market data over Yahoo's public chart, quote-summary, and search endpoints.
//! No API key required; fields the endpoints omit come back as `None`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

use super::MarketDataClient;
use crate::error::{AdvisorError, Result};
use crate::model::{CompanyProfile, Fundamentals, NewsArticle, PricePoint, Quote, Recommendations};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const TIMEOUT_SECONDS: u64 = 15;

/// Yahoo Finance market data client
pub struct YahooMarketClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for YahooMarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooMarketClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent("market-pulse/0.1")
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "fetching market data");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AdvisorError::MarketData(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    // from_f64 (not from_f64_retain): retain keeps binary-float noise, so
    // 132.40 would come back as 132.40000000000000568434188603
    fn decimal(value: Option<f64>) -> Option<Decimal> {
        value.and_then(Decimal::from_f64)
    }
}

#[async_trait]
impl MarketDataClient for YahooMarketClient {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1d",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let parsed: ChartEnvelope = self.get_json(&url).await?;
        let meta = parsed
            .chart
            .result
            .into_iter()
            .flatten()
            .next()
            .map(|r| r.meta)
            .ok_or_else(|| AdvisorError::QuoteUnavailable(symbol.to_string()))?;

        let price = Self::decimal(meta.regular_market_price)
            .ok_or_else(|| AdvisorError::QuoteUnavailable(symbol.to_string()))?;

        let mut quote = Quote::new(
            &meta.symbol,
            meta.short_name.unwrap_or_else(|| meta.symbol.clone()),
            price,
        );
        quote.previous_close = Self::decimal(meta.chart_previous_close).unwrap_or(price);
        quote.currency = meta.currency.unwrap_or_else(|| "USD".into());
        quote.volume = meta.regular_market_volume;
        quote.updated_at = Utc::now();

        Ok(quote)
    }

    async fn recommendations(&self, symbol: &str) -> Result<Recommendations> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=recommendationTrend",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let parsed: SummaryEnvelope = self.get_json(&url).await?;
        let trend = parsed
            .quote_summary
            .result
            .into_iter()
            .flatten()
            .next()
            .and_then(|r| r.recommendation_trend)
            .and_then(|t| t.trend.into_iter().next())
            .ok_or_else(|| AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                kind: "recommendation",
            })?;

        Ok(Recommendations {
            symbol: symbol.to_uppercase(),
            strong_buy: trend.strong_buy,
            buy: trend.buy,
            hold: trend.hold,
            sell: trend.sell,
            strong_sell: trend.strong_sell,
        })
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=summaryDetail,defaultKeyStatistics",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let parsed: SummaryEnvelope = self.get_json(&url).await?;
        let result = parsed
            .quote_summary
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                kind: "fundamentals",
            })?;

        let detail = result.summary_detail.unwrap_or_default();
        let stats = result.default_key_statistics.unwrap_or_default();

        Ok(Fundamentals {
            symbol: symbol.to_uppercase(),
            market_cap: Self::decimal(detail.market_cap.map(|v| v.raw)),
            pe_ratio: Self::decimal(detail.trailing_pe.map(|v| v.raw)),
            eps: Self::decimal(stats.trailing_eps.map(|v| v.raw)),
            week52_high: Self::decimal(detail.fifty_two_week_high.map(|v| v.raw)),
            week52_low: Self::decimal(detail.fifty_two_week_low.map(|v| v.raw)),
            // Yahoo reports yield as a fraction; the model carries percent
            dividend_yield: Self::decimal(detail.dividend_yield.map(|v| v.raw * 100.0)),
        })
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyProfile> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let parsed: SummaryEnvelope = self.get_json(&url).await?;
        let profile = parsed
            .quote_summary
            .result
            .into_iter()
            .flatten()
            .next()
            .and_then(|r| r.asset_profile)
            .ok_or_else(|| AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                kind: "company profile",
            })?;

        Ok(CompanyProfile {
            symbol: symbol.to_uppercase(),
            sector: profile.sector,
            industry: profile.industry,
            website: profile.website,
            employees: profile.full_time_employees,
            summary: profile.long_business_summary,
        })
    }

    async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url,
            urlencoding::encode(symbol),
            urlencoding::encode(range)
        );

        let parsed: ChartEnvelope = self.get_json(&url).await?;
        let result = parsed
            .chart
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                kind: "price history",
            })?;

        let closes = result
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .map(|q| q.close)
            .unwrap_or_default();

        Ok(result
            .timestamp
            .iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = Self::decimal(close)?;
                let date = DateTime::<Utc>::from_timestamp(*ts, 0)?;
                Some(PricePoint { date, close })
            })
            .collect())
    }

    async fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let url = format!(
            "{}/v1/finance/search?q={}&newsCount={}",
            self.base_url,
            urlencoding::encode(symbol),
            limit
        );

        let parsed: SearchEnvelope = self.get_json(&url).await?;

        Ok(parsed
            .news
            .into_iter()
            .take(limit)
            .map(|item| NewsArticle {
                symbol: symbol.to_uppercase(),
                headline: item.title,
                source: item.publisher.unwrap_or_else(|| "Yahoo Finance".into()),
                url: item.link,
                published_at: item
                    .provider_publish_time
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.quote("AAPL").await.is_ok()
    }

    fn name(&self) -> &str {
        "YahooFinance"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<IndicatorQuote>,
}

#[derive(Debug, Deserialize)]
struct IndicatorQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEnvelope {
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    recommendation_trend: Option<TrendBody>,
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
struct TrendBody {
    #[serde(default)]
    trend: Vec<TrendEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendEntry {
    #[serde(default)]
    strong_buy: u32,
    #[serde(default)]
    buy: u32,
    #[serde(default)]
    hold: u32,
    #[serde(default)]
    sell: u32,
    #[serde(default)]
    strong_sell: u32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    market_cap: Option<RawValue>,
    #[serde(default)]
    trailing_pe: Option<RawValue>,
    #[serde(default)]
    dividend_yield: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    trailing_eps: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    long_business_summary: Option<String>,
    #[serde(default)]
    full_time_employees: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNewsItem {
    title: String,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    provider_publish_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_quote_parsing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v8/finance/chart/NVDA?range=1d&interval=1d")
            .with_status(200)
            .with_body(
                r#"{"chart":{"result":[{"meta":{
                    "symbol":"NVDA",
                    "shortName":"NVIDIA Corporation",
                    "currency":"USD",
                    "regularMarketPrice":132.40,
                    "chartPreviousClose":128.75,
                    "regularMarketVolume":312500000
                }}],"error":null}}"#,
            )
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let quote = client.quote("NVDA").await.unwrap();

        assert_eq!(quote.symbol, "NVDA");
        assert_eq!(quote.price, dec!(132.40));
        assert_eq!(quote.previous_close, dec!(128.75));
        assert_eq!(quote.volume, Some(312_500_000));
    }

    #[test]
    fn test_decimal_conversion_drops_float_noise() {
        assert_eq!(YahooMarketClient::decimal(Some(132.40)), Some(dec!(132.40)));
        assert_eq!(
            YahooMarketClient::decimal(Some(132.40)).map(|d| d.to_string()),
            Some("132.4".to_string())
        );
        assert_eq!(YahooMarketClient::decimal(None), None);
    }

    #[tokio::test]
    async fn test_quote_missing_price() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v8/finance/chart/FAKE?range=1d&interval=1d")
            .with_status(200)
            .with_body(r#"{"chart":{"result":[{"meta":{"symbol":"FAKE"}}],"error":null}}"#)
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let err = client.quote("FAKE").await.unwrap_err();
        assert!(matches!(err, AdvisorError::QuoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_recommendations_parsing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/v10/finance/quoteSummary/NVDA?modules=recommendationTrend",
            )
            .with_status(200)
            .with_body(
                r#"{"quoteSummary":{"result":[{"recommendationTrend":{"trend":[
                    {"period":"0m","strongBuy":12,"buy":34,"hold":4,"sell":0,"strongSell":0}
                ]}}],"error":null}}"#,
            )
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let recs = client.recommendations("NVDA").await.unwrap();

        assert_eq!(recs.buy, 34);
        assert_eq!(recs.consensus(), "Buy");
    }

    #[tokio::test]
    async fn test_news_parsing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/finance/search?q=NVDA&newsCount=2")
            .with_status(200)
            .with_body(
                r#"{"news":[
                    {"title":"NVIDIA hits record","publisher":"Reuters","link":"https://example.com/a","providerPublishTime":1735000000},
                    {"title":"Chip demand surges","publisher":"Bloomberg"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let news = client.news("NVDA", 2).await.unwrap();

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].headline, "NVIDIA hits record");
        assert_eq!(news[0].source, "Reuters");
        assert!(news[0].published_at.is_some());
        assert!(news[1].url.is_none());
    }

    #[tokio::test]
    async fn test_company_info_parsing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v10/finance/quoteSummary/NVDA?modules=assetProfile")
            .with_status(200)
            .with_body(
                r#"{"quoteSummary":{"result":[{"assetProfile":{
                    "sector":"Technology",
                    "industry":"Semiconductors",
                    "website":"https://www.nvidia.com",
                    "longBusinessSummary":"NVIDIA provides graphics and compute platforms.",
                    "fullTimeEmployees":29600
                }}],"error":null}}"#,
            )
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let profile = client.company_info("NVDA").await.unwrap();

        assert_eq!(profile.symbol, "NVDA");
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.employees, Some(29_600));
        assert!(profile.summary.is_some());
    }

    #[tokio::test]
    async fn test_price_history_parsing_skips_null_closes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v8/finance/chart/NVDA?range=5d&interval=1d")
            .with_status(200)
            .with_body(
                r#"{"chart":{"result":[{
                    "meta":{"symbol":"NVDA"},
                    "timestamp":[1734912000,1734998400,1735084800],
                    "indicators":{"quote":[{"close":[128.75,null,132.40]}]}
                }],"error":null}}"#,
            )
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let history = client.price_history("NVDA", "5d").await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].close, dec!(128.75));
        assert_eq!(history[1].close, dec!(132.40));
        assert!(history[0].date < history[1].date);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_market_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = YahooMarketClient::with_base_url(server.url());
        let err = client.quote("NVDA").await.unwrap_err();
        assert!(matches!(err, AdvisorError::MarketData(_)));
    }
}
