//! Transcript turns
//!
//! A [`Turn`] is one atomic transcript entry. Turns are immutable once
//! appended; the transcript only ever grows.

use crate::persona::Persona;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker id used for the human participant's turns
pub const USER_SPEAKER_ID: &str = "user";

/// What kind of transcript entry a turn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Facilitator's opening statement
    Opening,
    /// Message from the human participant
    UserInput,
    /// A persona's response selected by fairness (or focus)
    AgentResponse,
    /// A persona's answer to a question addressed to it directly
    DirectQuestion,
}

/// One entry in a discussion transcript (immutable once appended)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker_id: String,
    pub display_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub kind: TurnKind,
}

impl Turn {
    fn from_persona(persona: Persona, message: impl Into<String>, kind: TurnKind) -> Self {
        Self {
            speaker_id: persona.key().to_string(),
            display_name: persona.display_name().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            kind,
        }
    }

    /// The facilitator's opening statement
    pub fn opening(message: impl Into<String>) -> Self {
        Self::from_persona(Persona::Facilitator, message, TurnKind::Opening)
    }

    /// A message from the human participant
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            speaker_id: USER_SPEAKER_ID.to_string(),
            display_name: "You".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            kind: TurnKind::UserInput,
        }
    }

    /// A persona's regular response
    pub fn agent(persona: Persona, message: impl Into<String>) -> Self {
        Self::from_persona(persona, message, TurnKind::AgentResponse)
    }

    /// A persona's answer to a direct question
    pub fn direct(persona: Persona, message: impl Into<String>) -> Self {
        Self::from_persona(persona, message, TurnKind::DirectQuestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors_set_kind() {
        assert_eq!(Turn::opening("welcome").kind, TurnKind::Opening);
        assert_eq!(Turn::user("hello").kind, TurnKind::UserInput);
        assert_eq!(
            Turn::agent(Persona::Analyst, "point").kind,
            TurnKind::AgentResponse
        );
        assert_eq!(
            Turn::direct(Persona::Skeptic, "answer").kind,
            TurnKind::DirectQuestion
        );
    }

    #[test]
    fn test_agent_turn_carries_persona_identity() {
        let turn = Turn::agent(Persona::Visionary, "imagine");
        assert_eq!(turn.speaker_id, "visionary");
        assert_eq!(turn.display_name, "Visionary");
    }

    #[test]
    fn test_turn_kind_serde_snake_case() {
        let json = serde_json::to_string(&TurnKind::DirectQuestion).unwrap();
        assert_eq!(json, "\"direct_question\"");
    }
}
