//! Session Management
//!
//! Keeps conversation history per playground conversation ID so follow-up
//! questions retain context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Conversation;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playground session: one conversation bound to one agent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Agent handling this session
    pub agent_id: String,

    /// Conversation history
    pub conversation: Conversation,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for an agent
    pub fn new(agent_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            agent_id: agent_id.into(),
            conversation: Conversation::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create with a specific ID (resuming a client-supplied conversation)
    pub fn with_id(id: SessionId, agent_id: impl Into<String>) -> Self {
        let mut session = Self::new(agent_id);
        session.id = id;
        session
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }
}

/// Session store trait for persistence
pub trait SessionStore: Send + Sync {
    /// Save a session
    fn save(&self, session: &Session) -> crate::Result<()>;

    /// Load a session by ID
    fn load(&self, id: &SessionId) -> crate::Result<Option<Session>>;

    /// Delete a session
    fn delete(&self, id: &SessionId) -> crate::Result<()>;
}

/// In-memory session store (playground default; nothing is persisted)
pub struct MemorySessionStore {
    sessions: std::sync::RwLock<std::collections::HashMap<SessionId, Session>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &Session) -> crate::Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| crate::AgentError::Other("session lock poisoned".into()))?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn load(&self, id: &SessionId) -> crate::Result<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| crate::AgentError::Other("session lock poisoned".into()))?;
        Ok(sessions.get(id).cloned())
    }

    fn delete(&self, id: &SessionId) -> crate::Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| crate::AgentError::Other("session lock poisoned".into()))?;
        sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_session_creation() {
        let session = Session::new("finance");
        assert_eq!(session.agent_id, "finance");
        assert_eq!(session.message_count(), 0);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let mut session = Session::new("team");
        session.conversation.push(Message::user("hello"));
        let id = session.id.clone();

        store.save(&session).unwrap();

        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.agent_id, "team");
        assert_eq!(loaded.message_count(), 1);

        store.delete(&id).unwrap();
        assert!(store.load(&id).unwrap().is_none());
    }
}
