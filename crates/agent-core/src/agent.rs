//! Agent Reasoning Loop
//!
//! An agent pairs a model with a role, a list of instructions, and an optional
//! toolset, then loops: complete, detect tool call, execute, feed the result
//! back, until the model answers in plain text.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Display name (e.g. "Finance AI Agent")
    pub name: String,

    /// One-line role statement, placed at the top of the system prompt
    pub role: Option<String>,

    /// Instruction bullets appended to the system prompt
    pub instructions: Vec<String>,

    /// Ask the model to format replies as markdown
    pub markdown: bool,

    /// Echo `Running: tool(...)` lines into the final reply
    pub show_tool_calls: bool,

    /// Maximum reasoning turns before giving up
    pub max_turns: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".into(),
            role: None,
            instructions: Vec::new(),
            markdown: true,
            show_tool_calls: false,
            max_turns: 10,
            generation: GenerationOptions::default(),
        }
    }
}

/// Outcome of a single agent run.
///
/// `content` is optional: downstream consumers (the dashboard segmenter in
/// particular) must check for the text field and fall back to
/// `display_text()` when it is absent, rather than assuming it exists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResponse {
    /// Final reply text, when the model produced any
    pub content: Option<String>,

    /// Agent that produced the reply
    pub agent: String,

    /// Model used
    pub model: String,

    /// Rendered tool invocations made during the run, in order
    pub tool_calls: Vec<String>,
}

impl RunResponse {
    /// Reply text, or a serialized rendering of the whole response when the
    /// model sent no content.
    pub fn display_text(&self) -> String {
        match &self.content {
            Some(text) => text.clone(),
            None => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Assemble the system prompt from role, instructions, and toolset
    pub fn build_system_prompt(&self) -> String {
        let mut prompt = String::new();

        if let Some(role) = &self.config.role {
            prompt.push_str(&format!("You are {}. {}\n", self.config.name, role));
        } else {
            prompt.push_str(&format!("You are {}, a helpful AI assistant.\n", self.config.name));
        }

        if !self.config.instructions.is_empty() {
            prompt.push_str("\n## Instructions\n\n");
            for instruction in &self.config.instructions {
                prompt.push_str(&format!("- {}\n", instruction));
            }
        }

        if self.config.markdown {
            prompt.push_str("\nFormat your replies as markdown.\n");
        }

        if !self.tools.is_empty() {
            prompt.push('\n');
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent over an existing conversation
    pub async fn run(&self, conversation: &mut Conversation) -> Result<RunResponse> {
        // Ensure the system prompt is present
        if conversation.messages().first().map(|m| &m.role) != Some(&Role::System) {
            conversation
                .messages_mut()
                .insert(0, Message::system(self.build_system_prompt()));
        }

        let mut tool_trace: Vec<String> = Vec::new();
        let mut turns = 0;

        loop {
            turns += 1;

            if turns > self.config.max_turns {
                return Err(AgentError::MaxTurns(self.config.max_turns));
            }

            conversation.truncate_to_fit();

            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.display_text();
            conversation.push(Message::assistant(&content).with_name(&self.config.name));

            if let Some(tool_call) = self.parse_tool_call(&content) {
                tracing::debug!(agent = %self.config.name, tool = %tool_call.name, "executing tool");
                tool_trace.push(tool_call.render());

                let result = self.execute_tool(&tool_call).await;
                let tool_message = format_tool_result(&result);
                conversation.push(Message::tool(tool_message, tool_call.id.clone()));

                continue;
            }

            // No tool call: this is the final reply
            let content = if self.config.show_tool_calls && !tool_trace.is_empty() {
                let mut echoed = String::new();
                for call in &tool_trace {
                    echoed.push_str(&format!("Running: {}\n", call));
                }
                echoed.push('\n');
                echoed.push_str(&content);
                echoed
            } else {
                content
            };

            return Ok(RunResponse {
                content: completion.content.map(|_| content),
                agent: self.config.name.clone(),
                model: completion.model,
                tool_calls: tool_trace,
            });
        }
    }

    /// Run with a plain string input (creates a temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<RunResponse> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Parse a tool call from the model's reply
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` fenced blocks first
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: raw JSON object with a "tool" key
        self.parse_inline_tool_call(content)
    }

    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        let start = content.find('{')?;
        let end = content.rfind('}')?;
        if end <= start {
            return None;
        }

        serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
    }

    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => ToolResult {
                name: call.name.clone(),
                id: call.id.clone(),
                success: false,
                output: format!("Error: {}", e),
            },
        }
    }

    /// Agent display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.name, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
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

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.config.role = Some(role.into());
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instructions.push(instruction.into());
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tool_boxed(mut self, tool: Arc<dyn crate::tool::Tool>) -> Self {
        self.tools.register_boxed(tool);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn markdown(mut self, markdown: bool) -> Self {
        self.config.markdown = markdown;
        self
    }

    pub fn show_tool_calls(mut self, show: bool) -> Self {
        self.config.show_tool_calls = show;
        self
    }

    pub fn max_turns(mut self, max: usize) -> Self {
        self.config.max_turns = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
