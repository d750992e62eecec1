//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Discussion topic cannot be empty")]
    EmptyTopic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_persona_display() {
        let error = DomainError::UnknownPersona("oracle".to_string());
        assert_eq!(error.to_string(), "Unknown persona: oracle");
    }
}
