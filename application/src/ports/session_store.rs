//! Session store port
//!
//! Discussions are looked up by id on every operation, so the store is an
//! injected interface rather than a process-global map - memory, database,
//! or distributed-cache backings are interchangeable without touching the
//! orchestrator.
//!
//! The store hands out [`SessionHandle`]s: the session behind a per-session
//! async mutex. Operations lock the handle for their duration, which
//! serializes concurrent operations on one session while leaving different
//! sessions fully independent.

use async_trait::async_trait;
use roundtable_domain::DiscussionSession;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<DiscussionSession>>;

/// Errors from session store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Keyed storage for discussion sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session and return its handle
    async fn insert(&self, session: DiscussionSession) -> Result<SessionHandle, StoreError>;

    /// Look up a session by id
    async fn get(&self, session_id: &str) -> Result<SessionHandle, StoreError>;

    /// Delete a session
    async fn remove(&self, session_id: &str) -> Result<(), StoreError>;
}
