//! TOML configuration file format
//!
//! Example configuration:
//!
//! ```toml
//! [throttle]
//! max_requests_per_second = 2.0
//! max_concurrent_requests = 3
//! backoff_multiplier = 2.0
//! max_retries = 3
//!
//! [discussion]
//! fan_out = 3
//! context_window = 8
//! participants = ["analyst", "visionary", "skeptic"]
//!
//! [gateway]
//! model = "gemini-2.0-flash"
//! api_key_env = "GENERATION_API_KEY"
//! request_timeout_secs = 30
//! ```

use roundtable_application::{DiscussionConfig, ThrottleConfig};
use roundtable_domain::{DomainError, Persona};
use serde::{Deserialize, Serialize};

/// Severity of a configuration issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found while validating loaded configuration
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Root configuration, merged from defaults, global and project files
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub throttle: FileThrottleConfig,
    pub discussion: FileDiscussionConfig,
    pub gateway: FileGatewayConfig,
}

impl FileConfig {
    /// Validate the merged configuration, collecting every issue instead of
    /// failing on the first.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.throttle.max_requests_per_second <= 0.0 {
            issues.push(ConfigIssue::error(
                "throttle.max_requests_per_second must be positive",
            ));
        }
        if self.throttle.max_concurrent_requests == 0 {
            issues.push(ConfigIssue::error(
                "throttle.max_concurrent_requests must be at least 1",
            ));
        }
        if self.throttle.backoff_multiplier < 1.0 {
            issues.push(ConfigIssue::warning(
                "throttle.backoff_multiplier below 1.0 makes retries faster than the first attempt",
            ));
        }
        if self.discussion.fan_out == 0 {
            issues.push(ConfigIssue::error("discussion.fan_out must be at least 1"));
        }
        if self.discussion.context_window == 0 {
            issues.push(ConfigIssue::error(
                "discussion.context_window must be at least 1",
            ));
        }
        if let Err(DomainError::UnknownPersona(name)) = self.discussion.parse_participants() {
            issues.push(ConfigIssue::error(format!(
                "discussion.participants contains unknown persona '{name}'"
            )));
        }
        if self.gateway.model.trim().is_empty() {
            issues.push(ConfigIssue::error("gateway.model must not be empty"));
        }

        issues
    }

    /// True when no error-severity issue is present.
    pub fn is_usable(&self) -> bool {
        !self
            .validate()
            .iter()
            .any(|i| i.severity == Severity::Error)
    }
}

/// `[throttle]` section - request queue tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileThrottleConfig {
    pub max_requests_per_second: f64,
    pub max_concurrent_requests: usize,
    pub backoff_multiplier: f64,
    pub max_retries: u32,
}

impl Default for FileThrottleConfig {
    fn default() -> Self {
        let defaults = ThrottleConfig::default();
        Self {
            max_requests_per_second: defaults.max_requests_per_second,
            max_concurrent_requests: defaults.max_concurrent_requests,
            backoff_multiplier: defaults.backoff_multiplier,
            max_retries: defaults.max_retries,
        }
    }
}

impl FileThrottleConfig {
    pub fn to_throttle_config(&self) -> ThrottleConfig {
        ThrottleConfig {
            max_requests_per_second: self.max_requests_per_second,
            max_concurrent_requests: self.max_concurrent_requests,
            backoff_multiplier: self.backoff_multiplier,
            max_retries: self.max_retries,
        }
    }
}

/// `[discussion]` section - orchestrator tuning and default participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Personas selected to respond to one user message
    pub fan_out: usize,
    /// Transcript turns included in every prompt
    pub context_window: usize,
    /// Default participant set, by persona key
    pub participants: Vec<String>,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let defaults = DiscussionConfig::default();
        Self {
            fan_out: defaults.fan_out,
            context_window: defaults.context_window,
            participants: Persona::all().iter().map(|p| p.key().to_string()).collect(),
        }
    }
}

impl FileDiscussionConfig {
    pub fn to_discussion_config(&self) -> DiscussionConfig {
        DiscussionConfig {
            fan_out: self.fan_out,
            context_window: self.context_window,
        }
    }

    /// Parse the configured participant keys into personas
    pub fn parse_participants(&self) -> Result<Vec<Persona>, DomainError> {
        self.participants.iter().map(|s| s.parse()).collect()
    }
}

/// `[gateway]` section - generation API endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL of the generative-language API
    pub api_base: String,
    /// Model identifier appended to the generate endpoint
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GENERATION_API_KEY".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_usable() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.is_usable());
    }

    #[test]
    fn test_deserialize_partial_toml_keeps_defaults() {
        let toml_str = r#"
[throttle]
max_concurrent_requests = 1

[discussion]
fan_out = 2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.throttle.max_concurrent_requests, 1);
        assert_eq!(config.throttle.max_retries, 3);
        assert_eq!(config.discussion.fan_out, 2);
        assert_eq!(config.discussion.context_window, 8);
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut config = FileConfig::default();
        config.throttle.max_requests_per_second = 0.0;
        config.throttle.max_concurrent_requests = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert!(!config.is_usable());
    }

    #[test]
    fn test_validate_warns_on_shrinking_backoff() {
        let mut config = FileConfig::default();
        config.throttle.backoff_multiplier = 0.5;

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(config.is_usable());
    }

    #[test]
    fn test_validate_flags_unknown_participant() {
        let mut config = FileConfig::default();
        config.discussion.participants = vec!["analyst".to_string(), "oracle".to_string()];

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.message.contains("oracle")));
    }

    #[test]
    fn test_parse_participants_preserves_order() {
        let config = FileDiscussionConfig {
            participants: vec!["skeptic".to_string(), "analyst".to_string()],
            ..FileDiscussionConfig::default()
        };
        let personas = config.parse_participants().unwrap();
        assert_eq!(personas, vec![Persona::Skeptic, Persona::Analyst]);
    }
}
