//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or not configured
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Authentication with the provider failed (bad or missing API key)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Provider rate limit hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments failed validation
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Reasoning loop exceeded its turn budget
    #[error("Maximum turns ({0}) reached")]
    MaxTurns(usize),

    /// Parse error (e.g. malformed tool-call JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if the operation can sensibly be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProviderUnavailable(_) | AgentError::RateLimited(_) | AgentError::Io(_)
        )
    }

    /// Convert to a message safe to surface in the playground UI
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Provider(msg) => format!("The model backend reported an error: {}", msg),
            AgentError::ProviderUnavailable(_) => {
                "The model backend is currently unreachable. Please try again.".into()
            }
            AgentError::Auth(_) => "Authentication with the model backend failed. Check the API key.".into(),
            AgentError::RateLimited(_) => "Too many requests. Please wait a moment.".into(),
            AgentError::ToolNotFound(name) => format!("The tool '{}' is not available.", name),
            AgentError::ToolValidation(msg) => format!("Invalid tool input: {}", msg),
            AgentError::ToolExecution(msg) => format!("Tool error: {}", msg),
            AgentError::MaxTurns(_) => {
                "The request took too many steps to answer. Please try a simpler query.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
