//! HTTP adapter for a generative-language API.
//!
//! Speaks the `models/{model}:generateContent` JSON shape. Non-success
//! responses are surfaced with their status and raw body so the throttle
//! can classify quota errors (429, `RESOURCE_EXHAUSTED`) from the upstream
//! signature itself.

use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use roundtable_application::{GatewayError, TextGateway};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors constructing the gateway (distinct from per-request errors)
#[derive(Error, Debug)]
pub enum GatewayBuildError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Gateway adapter calling a generative-language HTTP endpoint
pub struct HttpTextGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpTextGateway {
    /// Build the adapter from configuration, reading the API key from the
    /// configured environment variable.
    pub fn new(config: &FileGatewayConfig) -> Result<Self, GatewayBuildError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GatewayBuildError::MissingApiKey(config.api_key_env.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Pull the generated text out of a `generateContent` response body.
    ///
    /// Joins the text parts of the first candidate; returns `None` when the
    /// body has no text-bearing parts.
    fn extract_text(body: &serde_json::Value) -> Option<String> {
        let parts = body
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;

        let mut text = String::new();
        for part in parts {
            if let Some(t) = part.get("text").and_then(|t| t.as_str()) {
                text.push_str(t);
            }
        }

        if text.is_empty() { None } else { Some(text) }
    }
}

#[async_trait]
impl TextGateway for HttpTextGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, prompt_bytes = prompt.len(), "sending generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http { status, message });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Network(format!("invalid response body: {e}")))?;

        Self::extract_text(&body).ok_or(GatewayError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_candidate_parts() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Hello " },
                        { "text": "world" }
                    ]
                }
            }]
        });
        assert_eq!(
            HttpTextGateway::extract_text(&body),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let body = serde_json::json!({ "promptFeedback": {} });
        assert_eq!(HttpTextGateway::extract_text(&body), None);
    }

    #[test]
    fn test_extract_text_empty_parts() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        });
        assert_eq!(HttpTextGateway::extract_text(&body), None);
    }

    #[test]
    fn test_missing_api_key_is_a_build_error() {
        let config = FileGatewayConfig {
            api_key_env: "ROUNDTABLE_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..FileGatewayConfig::default()
        };
        let result = HttpTextGateway::new(&config);
        assert!(matches!(result, Err(GatewayBuildError::MissingApiKey(_))));
    }
}
