//! Per-session conversation history.
//!
//! Sessions are created lazily on first reference, live for the duration of
//! the process, and hold an append-only sequence of human/assistant turns.

use shopqa_core::{AppError, AppResult};
use shopqa_llm::ChatMessage;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory store mapping session keys to conversation histories.
///
/// One mutex guards the whole map; reads snapshot a session's turns and
/// appends push a completed exchange. Concurrent invocations for the same
/// key interleave with unspecified append order.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the history for a session, creating it if unseen.
    pub fn history(&self, session_id: &str) -> AppResult<Vec<ChatMessage>> {
        let mut sessions = self.lock()?;
        Ok(sessions.entry(session_id.to_string()).or_default().clone())
    }

    /// Append a completed exchange: the human input, then the assistant
    /// answer.
    pub fn append_exchange(&self, session_id: &str, input: &str, answer: &str) -> AppResult<()> {
        let mut sessions = self.lock()?;
        let turns = sessions.entry(session_id.to_string()).or_default();
        turns.push(ChatMessage::human(input));
        turns.push(ChatMessage::assistant(answer));
        Ok(())
    }

    /// Drop a session and its history.
    pub fn evict(&self, session_id: &str) -> AppResult<()> {
        self.lock()?.remove(session_id);
        Ok(())
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> AppResult<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, Vec<ChatMessage>>>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Chat("Session store lock poisoned".to_string()))
    }
}
