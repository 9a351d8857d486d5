//! Conversation Messages
//!
//! Standard message format shared by providers, agents, and the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected back as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Agent or user name, when the conversation involves several senders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool-call ID this message answers (tool messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool result message
    pub fn tool(content: impl Into<String>, tool_call_id: Option<String>) -> Self {
        let mut msg = Self::new(Role::Tool, content);
        msg.tool_call_id = tool_call_id;
        msg
    }

    /// Attach a sender name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Estimate token count (rough approximation, ~4 chars per token)
    pub fn estimate_tokens(&self) -> u32 {
        (self.content.len() / 4) as u32 + 4 // +4 for role overhead
    }
}

/// Conversation history with utility methods
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,

    /// Maximum context length (in estimated tokens)
    #[serde(default = "default_max_context")]
    max_context_tokens: u32,
}

fn default_max_context() -> u32 {
    8192
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            max_context_tokens: default_max_context(),
        }
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::system(prompt));
        conv
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get messages as mutable
    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Drop everything except the system prompt
    pub fn clear_history(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
    }

    /// Estimate total tokens in the conversation
    pub fn estimate_tokens(&self) -> u32 {
        self.messages.iter().map(|m| m.estimate_tokens()).sum()
    }

    /// Evict oldest non-system messages until the estimate fits the budget.
    /// The most recent message is never evicted.
    pub fn truncate_to_fit(&mut self) {
        while self.estimate_tokens() > self.max_context_tokens && self.messages.len() > 2 {
            if let Some(pos) = self.messages.iter().position(|m| m.role != Role::System) {
                if pos < self.messages.len() - 1 {
                    self.messages.remove(pos);
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("What is the latest on NVDA?");
        assert_eq!(msg.role, Role::User);
        assert!(msg.tool_call_id.is_none());
    }

    #[test]
    fn test_conversation() {
        let mut conv = Conversation::with_system_prompt("You are a finance assistant.");
        conv.push(Message::user("Quote AAPL"));
        conv.push(Message::assistant("AAPL is trading at $230."));

        assert_eq!(conv.len(), 3);
        assert_eq!(conv.last().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_clear_history_keeps_system() {
        let mut conv = Conversation::with_system_prompt("system");
        conv.push(Message::user("hello"));
        conv.clear_history();

        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].role, Role::System);
    }
}
