//! Agent Presets
//!
//! Canned agent configurations for the playground: a web-search agent, a
//! finance agent wired to the market data tools, and a team combining both.

use std::sync::Arc;

use agent_core::{Agent, AgentBuilder, LlmProvider, Result, Team, TeamBuilder};

use crate::market::MarketDataClient;
use crate::svckit::{
    AnalystRecommendationsTool, CompanyInfoTool, CompanyNewsTool, FundamentalsTool,
    HistoricalPricesTool, StockQuoteTool, WebSearchTool,
};

/// Agent that answers by searching the web and citing its sources.
pub fn web_search_agent(provider: Arc<dyn LlmProvider>) -> Result<Agent> {
    AgentBuilder::new()
        .provider(provider)
        .name("Web Search Agent")
        .role("Search the web for the information")
        .instruction("Always include the sources")
        .tool(WebSearchTool::new())
        .show_tool_calls(true)
        .markdown(true)
        .build()
}

/// Agent that answers with market data: quotes, analyst recommendations,
/// fundamentals, company profiles, price history, and company news.
pub fn finance_agent(
    provider: Arc<dyn LlmProvider>,
    market: Arc<dyn MarketDataClient>,
) -> Result<Agent> {
    AgentBuilder::new()
        .provider(provider)
        .name("Finance AI Agent")
        .role("Your goal is to provide financial data and analyst insights")
        .instruction("Use tables to display the data")
        .tool(StockQuoteTool::new(Arc::clone(&market)))
        .tool(AnalystRecommendationsTool::new(Arc::clone(&market)))
        .tool(FundamentalsTool::new(Arc::clone(&market)))
        .tool(CompanyInfoTool::new(Arc::clone(&market)))
        .tool(HistoricalPricesTool::new(Arc::clone(&market)))
        .tool(CompanyNewsTool::new(market))
        .show_tool_calls(true)
        .markdown(true)
        .build()
}

/// Composite team: delegates to both agents and merges their replies.
pub fn market_team(
    provider: Arc<dyn LlmProvider>,
    market: Arc<dyn MarketDataClient>,
) -> Result<Team> {
    let search = web_search_agent(Arc::clone(&provider))?;
    let finance = finance_agent(Arc::clone(&provider), market)?;

    TeamBuilder::new()
        .provider(provider)
        .name("Multi AI Agent")
        .member(Arc::new(search))
        .member(Arc::new(finance))
        .instruction("Always include the sources")
        .instruction("Use tables to display the data")
        .show_delegation(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use agent_core::provider::{
        Completion, CompletionStream, GenerationOptions, ModelInfo, ProviderInfo,
    };
    use agent_core::{AgentError, Message};
    use async_trait::async_trait;

    struct StubProvider;

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "stub".into(),
                models: vec![],
                supports_streaming: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            Ok(Completion {
                content: Some("ok".into()),
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            Err(AgentError::Provider("no streaming".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_web_search_agent_prompt() {
        let agent = web_search_agent(Arc::new(StubProvider)).unwrap();

        assert_eq!(agent.name(), "Web Search Agent");
        let prompt = agent.build_system_prompt();
        assert!(prompt.contains("Always include the sources"));
        assert!(prompt.contains("web_search"));
    }

    #[test]
    fn test_finance_agent_tools() {
        let agent =
            finance_agent(Arc::new(StubProvider), Arc::new(MockMarketClient::new())).unwrap();

        assert_eq!(agent.name(), "Finance AI Agent");
        assert_eq!(agent.tools().len(), 6);

        let prompt = agent.build_system_prompt();
        assert!(prompt.contains("Use tables to display the data"));
        assert!(prompt.contains("stock_quote"));
        assert!(prompt.contains("analyst_recommendations"));
        assert!(prompt.contains("company_info"));
        assert!(prompt.contains("historical_prices"));
    }

    #[test]
    fn test_team_members() {
        let team = market_team(Arc::new(StubProvider), Arc::new(MockMarketClient::new())).unwrap();

        assert_eq!(team.name(), "Multi AI Agent");
        assert_eq!(
            team.member_names(),
            vec!["Web Search Agent", "Finance AI Agent"]
        );
    }
}
