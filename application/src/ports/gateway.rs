//! Text generation gateway port
//!
//! Defines the interface to the external, quota-constrained generation API.
//! The gateway is an opaque fallible call; classification of transient
//! rate-limit failures happens in the throttle, by inspecting the error's
//! status and message against a fixed signature set.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the generation gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Non-success HTTP response. The message is the raw body, which may
    /// carry upstream signatures such as `RESOURCE_EXHAUSTED`.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("model returned an empty response")]
    EmptyResponse,
}

impl GatewayError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Gateway for text generation
///
/// `generate` must be safe to call any number of times with the same
/// prompt: the throttle replays it verbatim when retrying a transient
/// failure.
#[async_trait]
pub trait TextGateway: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}
