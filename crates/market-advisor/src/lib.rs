//! # market-advisor
//!
//! Stock-market agent toolkit: market data clients, agent tools, preset
//! agents, and the response segmenter that splits free-text agent replies
//! into the regions the dashboard renders.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌──────────────────┐   ┌───────────────────┐
//! │  query    │──▶│  Agent / Team    │──▶│  ResponseSegmenter │
//! └───────────┘   │  (svckit tools)  │   │  news/table/notes  │
//!                 └──────────────────┘   └───────────────────┘
//! ```
//!
//! The segmenter is the load-bearing piece: agent replies are unstructured
//! markdown, and the dashboard needs news cards, a data grid, and a notes
//! callout as separate regions.

pub mod agents;
pub mod error;
pub mod market;
pub mod model;
pub mod segment;
pub mod svckit;

pub use error::{AdvisorError, Result};
pub use market::{MarketDataClient, MockMarketClient, YahooMarketClient};
pub use model::{CompanyProfile, Fundamentals, NewsArticle, PricePoint, Quote, Recommendations};
pub use segment::{Segmentation, TableData, segment};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        AnalystRecommendationsTool, CompanyInfoTool, CompanyNewsTool, FundamentalsTool,
        HistoricalPricesTool, StockQuoteTool, WebSearchTool,
    };
}
