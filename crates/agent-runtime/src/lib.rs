//! # agent-runtime
//!
//! Runtime LLM providers for the market-pulse agents.
//!
//! ## Providers
//!
//! - **Groq** (default): Groq cloud inference via the OpenAI-compatible
//!   chat-completions API (the llama models the agents are tuned for)
//! - **OpenAI**: same wire format, different base URL and key
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiCompatProvider;
//!
//! let provider = OpenAiCompatProvider::groq_from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(any(feature = "groq", feature = "openai"))]
pub mod openai_compat;

#[cfg(any(feature = "groq", feature = "openai"))]
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Session, Team, Tool, ToolRegistry,
};
