//! Port for structured discussion logging.
//!
//! Separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures discussion events
//! (turns, responder failures, session lifecycle) in a machine-readable
//! format.

use serde_json::Value;

/// A structured discussion event for logging.
pub struct DiscussionEvent {
    /// Event type identifier (e.g., "turn_appended", "responder_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DiscussionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging discussion events to a structured log.
///
/// The `log` method is intentionally synchronous and non-fallible: a
/// logging failure must never disturb the discussion itself.
pub trait DiscussionLogger: Send + Sync {
    /// Record a discussion event.
    fn log(&self, event: DiscussionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDiscussionLogger;

impl DiscussionLogger for NoDiscussionLogger {
    fn log(&self, _event: DiscussionEvent) {}
}
