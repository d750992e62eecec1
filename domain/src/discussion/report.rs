//! Discussion result types - immutable value objects returned by operations.
//!
//! These are the shapes the (out-of-scope) HTTP layer serializes:
//! - [`DiscussionOpened`] - result of initializing a discussion
//! - [`TurnOutcome`] - per-responder breakdown of one user-input turn
//! - [`ConsensusAnalysis`] - structured agreement/disagreement extraction
//! - [`FinalReport`] - summary, consensus, and metrics at end of discussion

use crate::discussion::score::ParticipationScore;
use crate::discussion::turn::Turn;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of opening a discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionOpened {
    pub session_id: String,
    /// The facilitator's opening statement (first transcript turn)
    pub opening: Turn,
}

/// A responder that failed to produce a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderFailure {
    pub persona: Persona,
    pub error: String,
}

/// Outcome of one user-input turn: which personas responded, which failed.
///
/// Responses appear in completion order, which is not guaranteed to match
/// selection order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub user_turn: Turn,
    pub responses: Vec<Turn>,
    pub failures: Vec<ResponderFailure>,
}

impl TurnOutcome {
    /// True when every selected responder produced a turn.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Structured consensus extraction over the transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusAnalysis {
    /// Points the participants broadly agree on
    pub agreements: Vec<String>,
    /// Points of active disagreement
    pub disagreements: Vec<String>,
    /// Questions the discussion has not settled
    pub open_points: Vec<String>,
    /// Overall alignment in [0, 1]
    pub alignment: f64,
}

impl ConsensusAnalysis {
    /// Placeholder used when the model's analysis could not be extracted.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.agreements.is_empty() && self.disagreements.is_empty() && self.open_points.is_empty()
    }
}

/// Snapshot of discussion-level metrics for the final report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionMetrics {
    pub total_turns: usize,
    pub duration_ms: i64,
    pub participation: HashMap<Persona, ParticipationScore>,
    pub topic: String,
}

/// Immutable final report produced by ending a discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub session_id: String,
    pub summary: String,
    pub consensus: ConsensusAnalysis,
    pub metrics: DiscussionMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_outcome_completeness() {
        let outcome = TurnOutcome {
            user_turn: Turn::user("hello"),
            responses: vec![Turn::agent(Persona::Analyst, "hi")],
            failures: vec![],
        };
        assert!(outcome.is_complete());

        let partial = TurnOutcome {
            failures: vec![ResponderFailure {
                persona: Persona::Skeptic,
                error: "timeout".to_string(),
            }],
            ..outcome
        };
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_consensus_defaults_tolerate_missing_fields() {
        let parsed: ConsensusAnalysis =
            serde_json::from_str(r#"{"agreements": ["remote work saves commute time"]}"#).unwrap();
        assert_eq!(parsed.agreements.len(), 1);
        assert!(parsed.disagreements.is_empty());
        assert_eq!(parsed.alignment, 0.0);
    }

    #[test]
    fn test_unavailable_consensus_is_empty() {
        assert!(ConsensusAnalysis::unavailable().is_empty());
    }
}
