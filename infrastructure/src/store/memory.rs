//! In-memory session store.
//!
//! The default backing for single-process deployments. Sessions live for
//! the lifetime of the process; ended sessions stay retrievable until
//! explicitly removed.

use async_trait::async_trait;
use roundtable_application::{SessionHandle, SessionStore, StoreError};
use roundtable_domain::DiscussionSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Process-local `SessionStore` backed by a `HashMap`
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (active and ended)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: DiscussionSession) -> Result<SessionHandle, StoreError> {
        let id = session.id().to_string();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    async fn get(&self, session_id: &str) -> Result<SessionHandle, StoreError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))
    }

    async fn remove(&self, session_id: &str) -> Result<(), StoreError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{Persona, Topic};

    fn session(id: &str) -> DiscussionSession {
        DiscussionSession::new(id, Topic::new("storage"), vec![Persona::Analyst], None)
    }

    #[tokio::test]
    async fn test_insert_then_get_returns_same_session() {
        let store = InMemorySessionStore::new();
        store.insert(session("s-1")).await.unwrap();

        let handle = store.get("s-1").await.unwrap();
        assert_eq!(handle.lock().await.id(), "s-1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let result = store.get("missing").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_handles_share_state() {
        let store = InMemorySessionStore::new();
        store.insert(session("s-2")).await.unwrap();

        let a = store.get("s-2").await.unwrap();
        a.lock().await.end();

        let b = store.get("s-2").await.unwrap();
        assert!(!b.lock().await.is_active());
    }

    #[tokio::test]
    async fn test_remove_deletes_session() {
        let store = InMemorySessionStore::new();
        store.insert(session("s-3")).await.unwrap();
        store.remove("s-3").await.unwrap();

        assert!(store.is_empty().await);
        assert!(store.get("s-3").await.is_err());
    }
}
