//! Multi-Agent Teams
//!
//! A `Team` delegates the user's query to each member agent, then runs one
//! synthesis completion over the member replies. This mirrors the aggregating
//! orchestrator pattern: the coordinator never calls tools itself, it only
//! routes work and merges results.

use std::sync::Arc;

use crate::agent::{Agent, RunResponse};
use crate::error::Result;
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};

/// Team configuration
#[derive(Clone, Debug)]
pub struct TeamConfig {
    /// Display name for the composite agent
    pub name: String,

    /// Instruction bullets for the synthesis step
    pub instructions: Vec<String>,

    /// Echo `transfer_task_to_<member>` delegation markers into the reply.
    /// These are framework noise; the response segmenter strips them.
    pub show_delegation: bool,

    /// Generation options for the synthesis completion
    pub generation: GenerationOptions,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: "Multi AI Agent".into(),
            instructions: Vec::new(),
            show_delegation: false,
            generation: GenerationOptions::default(),
        }
    }
}

/// A composite agent that aggregates member agents
pub struct Team {
    provider: Arc<dyn LlmProvider>,
    members: Vec<Arc<Agent>>,
    config: TeamConfig,
}

impl Team {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        members: Vec<Arc<Agent>>,
        config: TeamConfig,
    ) -> Self {
        Self {
            provider,
            members,
            config,
        }
    }

    /// Team display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Member agent names
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    /// System prompt for the synthesis completion
    fn build_synthesis_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}, coordinating a team of specialist agents.\n\
             You will receive the user's question and each specialist's reply.\n\
             Merge them into one coherent answer.\n",
            self.config.name
        );

        if !self.config.instructions.is_empty() {
            prompt.push_str("\n## Instructions\n\n");
            for instruction in &self.config.instructions {
                prompt.push_str(&format!("- {}\n", instruction));
            }
        }

        prompt
    }

    /// Run the full delegate-then-synthesize cycle on a query
    pub async fn respond(&self, query: &str) -> Result<RunResponse> {
        let mut delegation_trace: Vec<String> = Vec::new();
        let mut member_replies: Vec<(String, String)> = Vec::new();

        for member in &self.members {
            let marker = format!("transfer_task_to_{}", slugify(member.name()));
            tracing::info!(team = %self.config.name, member = %member.name(), "delegating query");
            delegation_trace.push(marker);

            match member.ask(query).await {
                Ok(response) => {
                    member_replies.push((member.name().to_string(), response.display_text()));
                }
                Err(e) => {
                    // A failed member degrades the answer, it does not sink the team
                    tracing::warn!(member = %member.name(), error = %e, "member agent failed");
                    member_replies.push((
                        member.name().to_string(),
                        format!("(no reply: {})", e.user_message()),
                    ));
                }
            }
        }

        let mut synthesis_input = format!("User question: {}\n", query);
        for (name, reply) in &member_replies {
            synthesis_input.push_str(&format!("\n## Reply from {}\n\n{}\n", name, reply));
        }

        let messages = vec![
            Message::system(self.build_synthesis_prompt()),
            Message::user(synthesis_input),
        ];

        let completion = self
            .provider
            .complete(&messages, &self.config.generation)
            .await?;

        let mut content = completion.display_text();
        if self.config.show_delegation {
            let mut echoed = String::new();
            for marker in &delegation_trace {
                echoed.push_str(&format!("Running: {}\n", marker));
            }
            echoed.push('\n');
            echoed.push_str(&content);
            content = echoed;
        }

        Ok(RunResponse {
            content: completion.content.map(|_| content),
            agent: self.config.name.clone(),
            model: completion.model,
            tool_calls: delegation_trace,
        })
    }
}

/// Lowercase, underscore-separated member name for delegation markers
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Builder for teams
pub struct TeamBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    members: Vec<Arc<Agent>>,
    config: TeamConfig,
}

impl Default for TeamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            members: Vec::new(),
            config: TeamConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn member(mut self, agent: Arc<Agent>) -> Self {
        self.members.push(agent);
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instructions.push(instruction.into());
        self
    }

    pub fn show_delegation(mut self, show: bool) -> Self {
        self.config.show_delegation = show;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn build(self) -> Result<Team> {
        let provider = self
            .provider
            .ok_or_else(|| crate::error::AgentError::Config("Provider is required".into()))?;

        Ok(Team::new(provider, self.members, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentBuilder;
    use crate::error::AgentError;
    use crate::provider::{Completion, CompletionStream, ModelInfo, ProviderInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: pops canned outcomes in order and records the last
    /// request's messages so the synthesis input can be inspected.
    struct ScriptedProvider {
        replies: Mutex<Vec<std::result::Result<&'static str, &'static str>>>,
        last_input: Mutex<String>,
    }

    impl ScriptedProvider {
        fn new(mut replies: Vec<std::result::Result<&'static str, &'static str>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                last_input: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "scripted".into(),
                models: vec![],
                supports_streaming: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            if let Some(last) = messages.last() {
                *self.last_input.lock().unwrap() = last.content.clone();
            }

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?
                .map_err(|e| AgentError::Provider(e.into()))?;
            Ok(Completion {
                content: Some(reply.into()),
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

    fn two_member_team(provider: Arc<ScriptedProvider>, show_delegation: bool) -> Team {
        let search = AgentBuilder::new()
            .provider(provider.clone())
            .name("Web Search Agent")
            .build()
            .unwrap();
        let finance = AgentBuilder::new()
            .provider(provider.clone())
            .name("Finance AI Agent")
            .build()
            .unwrap();

        TeamBuilder::new()
            .provider(provider)
            .name("Multi AI Agent")
            .member(Arc::new(search))
            .member(Arc::new(finance))
            .instruction("Always include the sources")
            .show_delegation(show_delegation)
            .build()
            .unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Finance AI Agent"), "finance_ai_agent");
        assert_eq!(slugify("Web Search Agent"), "web_search_agent");
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(TeamBuilder::new().build().is_err());
    }

    #[tokio::test]
    async fn test_respond_delegates_then_synthesizes() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("NVDA coverage from the web."),
            Ok("NVDA is trading at $132.40."),
            Ok("Merged answer with sources."),
        ]));
        let team = two_member_team(provider.clone(), true);

        let response = team.respond("What is happening with NVDA?").await.unwrap();

        assert_eq!(
            response.tool_calls,
            vec![
                "transfer_task_to_web_search_agent",
                "transfer_task_to_finance_ai_agent",
            ]
        );

        let text = response.display_text();
        assert!(text.starts_with("Running: transfer_task_to_web_search_agent"));
        assert!(text.contains("Running: transfer_task_to_finance_ai_agent"));
        assert!(text.ends_with("Merged answer with sources."));

        // Both member replies made it into the synthesis input
        let synthesis_input = provider.last_input.lock().unwrap().clone();
        assert!(synthesis_input.contains("## Reply from Web Search Agent"));
        assert!(synthesis_input.contains("NVDA is trading at $132.40."));
    }

    #[tokio::test]
    async fn test_respond_without_delegation_markers() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Web reply."),
            Ok("Finance reply."),
            Ok("Merged answer."),
        ]));
        let team = two_member_team(provider, false);

        let response = team.respond("NVDA?").await.unwrap();
        assert_eq!(response.content.as_deref(), Some("Merged answer."));
        assert_eq!(response.agent, "Multi AI Agent");
    }

    #[tokio::test]
    async fn test_failed_member_degrades_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err("connection refused"),
            Ok("Finance reply."),
            Ok("Partial answer from the finance agent."),
        ]));
        let team = two_member_team(provider.clone(), false);

        let response = team.respond("NVDA?").await.unwrap();
        assert_eq!(
            response.content.as_deref(),
            Some("Partial answer from the finance agent.")
        );
        assert_eq!(response.tool_calls.len(), 2);

        // The failed member is reported to the synthesizer, not dropped
        let synthesis_input = provider.last_input.lock().unwrap().clone();
        assert!(synthesis_input.contains("(no reply:"));
        assert!(synthesis_input.contains("Finance reply."));
    }
}
