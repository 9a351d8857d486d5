//! OpenAI-Compatible Chat Provider
//!
//! Implementation of `LlmProvider` for any backend speaking the OpenAI
//! chat-completions wire format. Groq and OpenAI both do; they differ only in
//! base URL and API key.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, ModelInfo,
        ProviderInfo, StreamChunk, TokenUsage,
    },
};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiCompatConfig {
    /// Backend display name ("Groq", "OpenAI")
    pub name: String,

    /// Base URL up to and including the version segment
    pub base_url: String,

    /// Bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiCompatConfig {
    /// Groq cloud configuration from `GROQ_API_KEY` / `GROQ_BASE_URL`
    #[cfg(feature = "groq")]
    pub fn groq_from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| AgentError::Config("GROQ_API_KEY is not set".into()))?;
        let base_url = std::env::var("GROQ_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".into());

        Ok(Self {
            name: "Groq".into(),
            base_url,
            api_key,
            timeout_secs: 120,
        })
    }

    /// OpenAI configuration from `OPENAI_API_KEY` / `OPENAI_BASE_URL`
    #[cfg(feature = "openai")]
    pub fn openai_from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::Config("OPENAI_API_KEY is not set".into()))?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());

        Ok(Self {
            name: "OpenAI".into(),
            base_url,
            api_key,
            timeout_secs: 120,
        })
    }
}

/// LLM provider for OpenAI-compatible chat-completions backends
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiCompatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Groq provider from environment variables
    #[cfg(feature = "groq")]
    pub fn groq_from_env() -> Result<Self> {
        Self::from_config(OpenAiCompatConfig::groq_from_env()?)
    }

    /// OpenAI provider from environment variables
    #[cfg(feature = "openai")]
    pub fn openai_from_env() -> Result<Self> {
        Self::from_config(OpenAiCompatConfig::openai_from_env()?)
    }

    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    // Tool results go back as user context; we drive the tool
                    // loop ourselves rather than through native tool calling
                    Role::Tool => "user",
                };
                WireMessage {
                    role: role.into(),
                    content: Some(m.content.clone()),
                }
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> ChatRequest {
        ChatRequest {
            model: options.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: if options.stop_sequences.is_empty() {
                None
            } else {
                Some(options.stop_sequences.clone())
            },
            stream,
        }
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => AgentError::Auth(body),
            429 => AgentError::RateLimited(body),
            _ => AgentError::Provider(format!("{}: {}", status, body)),
        })
    }

    fn convert_completion(response: ChatResponse) -> Completion {
        let (content, finish_reason) = response
            .choices
            .into_iter()
            .next()
            .map(|c| (c.message.content, c.finish_reason))
            .unwrap_or((None, None));

        Completion {
            content,
            model: response.model,
            usage: response.usage.map(TokenUsage::from),
            finish_reason: finish_reason.as_deref().map(|r| match r {
                "length" => FinishReason::Length,
                "tool_calls" => FinishReason::ToolUse,
                "content_filter" => FinishReason::ContentFilter,
                _ => FinishReason::Stop,
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: self.config.name.clone(),
            models,
            supports_streaming: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(provider = %self.config.name, "health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = self.build_request(messages, options, false);
        let response = self.post_chat(&request).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Ok(Self::convert_completion(parsed))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let request = self.build_request(messages, options, true);
        let response = self.post_chat(&request).await?;

        // Server-sent events: "data: {json}" lines, terminated by "data: [DONE]"
        let bytes = Box::pin(response.bytes_stream());
        let stream = futures::stream::unfold(
            (bytes, String::new(), false),
            |(mut bytes, mut buffer, finished)| async move {
                if finished {
                    return None;
                }

                loop {
                    if let Some(pos) = buffer.find('\n') {
                        let line: String = buffer.drain(..=pos).collect();
                        let line = line.trim();

                        let Some(payload) = line.strip_prefix("data:") else {
                            continue;
                        };
                        let payload = payload.trim();

                        if payload == "[DONE]" {
                            let chunk = StreamChunk {
                                delta: String::new(),
                                done: true,
                                usage: None,
                            };
                            return Some((Ok(chunk), (bytes, buffer, true)));
                        }

                        match serde_json::from_str::<StreamPayload>(payload) {
                            Ok(parsed) => {
                                let delta = parsed
                                    .choices
                                    .first()
                                    .and_then(|c| c.delta.content.clone())
                                    .unwrap_or_default();
                                let done = parsed
                                    .choices
                                    .first()
                                    .is_some_and(|c| c.finish_reason.is_some());
                                let chunk = StreamChunk {
                                    delta,
                                    done,
                                    usage: parsed.usage.map(TokenUsage::from),
                                };
                                return Some((Ok(chunk), (bytes, buffer, false)));
                            }
                            Err(e) => {
                                let err = AgentError::Parse(e.to_string());
                                return Some((Err(err), (bytes, buffer, true)));
                            }
                        }
                    }

                    match bytes.next().await {
                        Some(Ok(b)) => buffer.push_str(&String::from_utf8_lossy(&b)),
                        Some(Err(e)) => {
                            let err = AgentError::Provider(e.to_string());
                            return Some((Err(err), (bytes, buffer, true)));
                        }
                        None => return None,
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::Provider(format!(
                "model listing failed: {}",
                response.status()
            )));
        }

        let parsed: ModelList = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Ok(parsed
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
                context_length: m.context_window,
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<WireUsage> for TokenUsage {
    fn from(u: WireUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamPayload {
    choices: Vec<StreamChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    context_window: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::message::Message;

    fn test_provider(base_url: &str) -> OpenAiCompatProvider {
        OpenAiCompatProvider::from_config(OpenAiCompatConfig {
            name: "Test".into(),
            base_url: base_url.into(),
            api_key: "test-key".into(),
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            Message::system("You are a finance assistant."),
            Message::user("Quote NVDA"),
            Message::tool("[Tool 'stock_quote' returned]\nNVDA: $132.40", None),
        ];

        let converted = OpenAiCompatProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[2].role, "user"); // tool results ride as user context
    }

    #[tokio::test]
    async fn test_complete_parses_choices() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "llama-3.3-70b-versatile",
                    "choices": [{
                        "message": {"role": "assistant", "content": "NVDA is up 2%."},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
                }"#,
            )
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let completion = provider
            .complete(&[Message::user("Quote NVDA")], &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(completion.content.as_deref(), Some("NVDA is up 2%."));
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 28);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_null_content_survives() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "llama-3.3-70b-versatile",
                    "choices": [{
                        "message": {"role": "assistant", "content": null},
                        "finish_reason": "content_filter"
                    }],
                    "usage": null
                }"#,
            )
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let completion = provider
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap();

        assert!(completion.content.is_none());
        assert_eq!(completion.finish_reason, Some(FinishReason::ContentFilter));
        // display_text degrades to a serialized rendering instead of panicking
        assert!(!completion.display_text().is_empty());
    }

    #[tokio::test]
    async fn test_auth_error_mapping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": "invalid api key"}"#)
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let err = provider
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Auth(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retryable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let err = provider
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_stream_chunks() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                "data: {\"choices\":[{\"delta\":{\"content\":\"NVDA \"},\"finish_reason\":null}],\"usage\":null}\n\n\
                 data: {\"choices\":[{\"delta\":{\"content\":\"is up.\"},\"finish_reason\":null}],\"usage\":null}\n\n\
                 data: [DONE]\n\n",
            )
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let mut stream = provider
            .complete_stream(&[Message::user("Quote NVDA")], &GenerationOptions::default())
            .await
            .unwrap();

        let mut text = String::new();
        let mut saw_done = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            text.push_str(&chunk.delta);
            if chunk.done {
                saw_done = true;
            }
        }

        assert_eq!(text, "NVDA is up.");
        assert!(saw_done);
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(
                r#"{"data": [
                    {"id": "llama-3.3-70b-versatile", "context_window": 131072},
                    {"id": "llama-3.1-8b-instant"}
                ]}"#,
            )
            .create_async()
            .await;

        let provider = test_provider(&server.url());
        let models = provider.list_models().await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "llama-3.3-70b-versatile");
        assert_eq!(models[0].context_length, Some(131_072));
        assert!(models[1].context_length.is_none());
    }
}
