//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, an extensible tool
//! system, and multi-agent teams.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Team                                │
//! │  ┌────────────────────┐      ┌────────────────────┐          │
//! │  │  Agent             │      │  Agent             │   ...    │
//! │  │  ┌──────────────┐  │      │  ┌──────────────┐  │          │
//! │  │  │ Reasoning    │  │      │  │ Reasoning    │  │          │
//! │  │  │ Loop + Tools │  │      │  │ Loop + Tools │  │          │
//! │  │  └──────────────┘  │      │  └──────────────┘  │          │
//! │  └─────────┬──────────┘      └─────────┬──────────┘          │
//! │            └───────── LlmProvider ─────┘                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Groq, OpenAI, or any other
//! OpenAI-compatible backend without changing agent logic.

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod team;
pub mod tool;

pub use agent::{Agent, AgentBuilder, AgentConfig, RunResponse};
pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
pub use team::{Team, TeamBuilder, TeamConfig};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
