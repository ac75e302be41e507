//! Concurrent store of live relay sessions.
//!
//! Entries are only read for listing and mutated on open/close; byte
//! counters live behind atomics so relay loops never take the map lock.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{RelaySession, SessionId, SessionSummary};
use crate::error::RelayError;

/// Central store for all live relays.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, RelaySession>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new session.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if a session with the same ID is
    /// already registered (should never happen with UUID v4).
    pub async fn insert(&self, session: RelaySession) -> Result<SessionId, RelayError> {
        let id = session.id;
        let mut map = self.sessions.write().await;
        if map.contains_key(&id) {
            return Err(RelayError::Internal(format!("session {id} already exists")));
        }
        map.insert(id, session);
        Ok(id)
    }

    /// Returns a summary of one session.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::SessionNotFound`] if no such session is live.
    pub async fn get(&self, id: SessionId) -> Result<SessionSummary, RelayError> {
        let map = self.sessions.read().await;
        map.get(&id)
            .map(SessionSummary::from)
            .ok_or(RelayError::SessionNotFound(*id.as_uuid()))
    }

    /// Removes a session, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::SessionNotFound`] if no such session is live.
    pub async fn remove(&self, id: SessionId) -> Result<RelaySession, RelayError> {
        let mut map = self.sessions.write().await;
        map.remove(&id)
            .ok_or(RelayError::SessionNotFound(*id.as_uuid()))
    }

    /// Returns summaries of all sessions, oldest first.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let map = self.sessions.read().await;
        let mut summaries: Vec<SessionSummary> = map.values().map(SessionSummary::from).collect();
        summaries.sort_by_key(|s| s.opened_at);
        summaries
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
