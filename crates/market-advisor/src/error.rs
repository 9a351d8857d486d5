//! Error Types for Market Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("Quote unavailable for {0}")]
    QuoteUnavailable(String),

    #[error("Symbol not supported: {0}")]
    UnsupportedSymbol(String),

    #[error("No {kind} data available for {symbol}")]
    DataUnavailable { symbol: String, kind: &'static str },

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
