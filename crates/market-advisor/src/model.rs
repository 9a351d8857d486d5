//! Domain Models
//!
//! Core data types for equity market data.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stock quote snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol (e.g. "NVDA", "AAPL")
    pub symbol: String,

    /// Company name (e.g. "NVIDIA Corporation")
    pub name: String,

    /// Last traded price
    pub price: Decimal,

    /// Previous session close
    pub previous_close: Decimal,

    /// Quote currency (e.g. "USD")
    pub currency: String,

    /// Session volume, when reported
    pub volume: Option<u64>,

    /// Quote timestamp
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            price,
            previous_close: price,
            currency: "USD".into(),
            volume: None,
            updated_at: Utc::now(),
        }
    }

    /// Percent change vs the previous close
    pub fn change_percent(&self) -> Decimal {
        if self.previous_close == Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.price - self.previous_close) / self.previous_close * Decimal::from(100)
    }
}

/// Analyst recommendation counts for a symbol
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendations {
    pub symbol: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

impl Recommendations {
    /// Total number of covering analysts
    pub fn total(&self) -> u32 {
        self.strong_buy + self.buy + self.hold + self.sell + self.strong_sell
    }

    /// One-word consensus label weighted by counts
    pub fn consensus(&self) -> &'static str {
        let bullish = self.strong_buy + self.buy;
        let bearish = self.sell + self.strong_sell;

        if self.total() == 0 {
            "No coverage"
        } else if bullish > self.hold + bearish {
            "Buy"
        } else if bearish > self.hold + bullish {
            "Sell"
        } else {
            "Hold"
        }
    }
}

/// Company fundamentals snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,

    /// Market capitalization
    pub market_cap: Option<Decimal>,

    /// Trailing price/earnings ratio
    pub pe_ratio: Option<Decimal>,

    /// Trailing earnings per share
    pub eps: Option<Decimal>,

    /// 52-week high
    pub week52_high: Option<Decimal>,

    /// 52-week low
    pub week52_low: Option<Decimal>,

    /// Dividend yield, as a percentage
    pub dividend_yield: Option<Decimal>,
}

/// Company profile details
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,

    /// Sector label (e.g. "Technology")
    pub sector: Option<String>,

    /// Industry label (e.g. "Semiconductors")
    pub industry: Option<String>,

    /// Corporate website
    pub website: Option<String>,

    /// Full-time employee count
    pub employees: Option<u64>,

    /// Business summary paragraph
    pub summary: Option<String>,
}

/// One daily close from a price history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub close: Decimal,
}

/// A company news headline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Symbol this headline was fetched for
    pub symbol: String,

    /// Headline text
    pub headline: String,

    /// Publisher name
    pub source: String,

    /// Link to the story, when available
    pub url: Option<String>,

    /// Publication time, when reported
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_change_percent() {
        let mut quote = Quote::new("NVDA", "NVIDIA Corporation", dec!(132.40));
        quote.previous_close = dec!(120.00);

        let change = quote.change_percent();
        assert!(change > dec!(10.3) && change < dec!(10.4));
    }

    #[test]
    fn test_change_percent_zero_close() {
        let mut quote = Quote::new("X", "X Corp", dec!(10));
        quote.previous_close = Decimal::ZERO;
        assert_eq!(quote.change_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_consensus() {
        let recs = Recommendations {
            symbol: "NVDA".into(),
            strong_buy: 12,
            buy: 20,
            hold: 5,
            sell: 1,
            strong_sell: 0,
        };
        assert_eq!(recs.consensus(), "Buy");
        assert_eq!(recs.total(), 38);

        let none = Recommendations {
            symbol: "X".into(),
            strong_buy: 0,
            buy: 0,
            hold: 0,
            sell: 0,
            strong_sell: 0,
        };
        assert_eq!(none.consensus(), "No coverage");
    }
}
