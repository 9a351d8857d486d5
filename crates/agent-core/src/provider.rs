//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for all LLM providers (Groq, OpenAI, etc.)
//! so agents work against any backend without code changes.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::Result;
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g. "llama-3.3-70b-versatile", "gpt-4o-mini")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_top_p() -> f32 {
    0.9
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: Vec::new(),
        }
    }
}

/// Response from an LLM completion.
///
/// `content` is optional on purpose: the OpenAI-compatible wire format sends
/// `null` content for some finish reasons, so callers must check for presence
/// rather than assume text is always there.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text, when the backend produced any
    pub content: Option<String>,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if reported)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Text content, or the serialized completion when the backend sent none.
    pub fn display_text(&self) -> String {
        match &self.content {
            Some(text) => text.clone(),
            None => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Error,
}

/// A chunk from streaming completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamChunk {
    /// The text delta
    pub delta: String,

    /// Whether this is the final chunk
    pub done: bool,

    /// Token usage (typically only on the final chunk)
    pub usage: Option<TokenUsage>,
}

/// Stream type for completion streaming
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Information about a model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub context_length: Option<u32>,
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g. "Groq", "OpenAI")
    pub name: String,

    /// Available models
    pub models: Vec<ModelInfo>,

    /// Whether streaming is supported
    pub supports_streaming: bool,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new backends.
/// Agents work exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider information and capabilities
    async fn info(&self) -> Result<ProviderInfo>;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;

    /// Generate a streaming completion
    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Estimate token count for text (provider-specific tokenization)
    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~4 chars per token for llama-family tokenizers
        (text.len() / 4) as u32
    }
}
