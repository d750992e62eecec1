//! Discussion session aggregate
//!
//! A [`DiscussionSession`] owns one discussion's transcript, participation
//! scores, and lifecycle status. Sessions are never shared between
//! discussions; concurrent access within one discussion is the caller's
//! responsibility (the application layer holds a per-session lock).

use crate::core::topic::Topic;
use crate::discussion::score::ParticipationScore;
use crate::discussion::turn::{Turn, TurnKind};
use crate::persona::Persona;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle state of a discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionStatus {
    Active,
    Ended,
}

impl DiscussionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionStatus::Active => "active",
            DiscussionStatus::Ended => "ended",
        }
    }
}

/// One discussion's complete state (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionSession {
    id: String,
    topic: Topic,
    context: Option<String>,
    participants: Vec<Persona>,
    transcript: Vec<Turn>,
    scores: HashMap<Persona, ParticipationScore>,
    status: DiscussionStatus,
    started_at: DateTime<Utc>,
}

impl DiscussionSession {
    /// Create an active session with zeroed scores for every participant.
    ///
    /// Registration order of `participants` is preserved; it is the
    /// fairness tie-break.
    pub fn new(
        id: impl Into<String>,
        topic: Topic,
        participants: Vec<Persona>,
        context: Option<String>,
    ) -> Self {
        let scores = participants
            .iter()
            .map(|&p| (p, ParticipationScore::default()))
            .collect();
        Self {
            id: id.into(),
            topic,
            context,
            participants,
            transcript: Vec::new(),
            scores,
            status: DiscussionStatus::Active,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn participants(&self) -> &[Persona] {
        &self.participants
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn participation(&self) -> &HashMap<Persona, ParticipationScore> {
        &self.scores
    }

    pub fn status(&self) -> DiscussionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == DiscussionStatus::Active
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_participant(&self, persona: Persona) -> bool {
        self.participants.contains(&persona)
    }

    /// The most recent `n` turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }

    /// Append a turn to the transcript.
    pub fn append_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    /// Record a persona's successful fairness-selected response.
    ///
    /// Appends the turn and updates the persona's score as one unit; the
    /// transcript and the counters cannot drift apart.
    pub fn record_response(&mut self, persona: Persona, message: impl Into<String>) -> Turn {
        let turn = Turn::agent(persona, message);
        self.scores
            .entry(persona)
            .or_default()
            .record_response(turn.message.len());
        self.transcript.push(turn.clone());
        turn
    }

    /// Record a persona's answer to a direct question.
    ///
    /// Direct questions are transcript-only: they do not feed the fairness
    /// counters.
    pub fn record_direct_response(&mut self, persona: Persona, message: impl Into<String>) -> Turn {
        let turn = Turn::direct(persona, message);
        self.transcript.push(turn.clone());
        turn
    }

    /// Close the discussion. The session is retained for reporting.
    pub fn end(&mut self) {
        self.status = DiscussionStatus::Ended;
    }

    /// Count of turns of the given kind.
    pub fn count_turns(&self, kind: TurnKind) -> usize {
        self.transcript.iter().filter(|t| t.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DiscussionSession {
        DiscussionSession::new(
            "s-1",
            Topic::new("testing in production"),
            vec![Persona::Analyst, Persona::Skeptic],
            None,
        )
    }

    #[test]
    fn test_new_session_zeroes_scores() {
        let s = session();
        assert!(s.is_active());
        assert_eq!(s.participation().len(), 2);
        for score in s.participation().values() {
            assert_eq!(score.response_count, 0);
        }
    }

    #[test]
    fn test_record_response_updates_turn_and_score_together() {
        let mut s = session();
        s.record_response(Persona::Analyst, "first point");

        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].kind, TurnKind::AgentResponse);
        assert_eq!(s.participation()[&Persona::Analyst].response_count, 1);
        assert_eq!(s.participation()[&Persona::Skeptic].response_count, 0);
    }

    #[test]
    fn test_direct_response_skips_scores() {
        let mut s = session();
        s.record_direct_response(Persona::Skeptic, "direct answer");

        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].kind, TurnKind::DirectQuestion);
        assert_eq!(s.participation()[&Persona::Skeptic].response_count, 0);
    }

    #[test]
    fn test_recent_turns_window() {
        let mut s = session();
        for i in 0..5 {
            s.append_turn(Turn::user(format!("message {i}")));
        }

        let window = s.recent_turns(3);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].message, "message 2");
        assert_eq!(window[2].message, "message 4");

        // Window larger than the transcript returns everything
        assert_eq!(s.recent_turns(100).len(), 5);
    }

    #[test]
    fn test_end_retains_transcript() {
        let mut s = session();
        s.record_response(Persona::Analyst, "a point");
        s.end();

        assert_eq!(s.status(), DiscussionStatus::Ended);
        assert_eq!(s.transcript().len(), 1);
    }
}
