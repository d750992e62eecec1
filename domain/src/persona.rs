//! Persona registry - the closed set of agent personalities
//!
//! Personas are a domain concept: each one is an independently-prompted
//! discussion participant with a fixed instruction template. The set is
//! closed: adding a persona means adding a variant here, and the
//! compiler points at every match that needs updating.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An agent personality participating in a discussion (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    /// Opens the discussion and keeps it moving
    Facilitator,
    /// Breaks the topic into parts and weighs evidence
    Analyst,
    /// Pushes for bold, unconventional angles
    Visionary,
    /// Challenges assumptions and probes weak points
    Skeptic,
    /// Grounds ideas in cost, effort, and feasibility
    Pragmatist,
}

impl Persona {
    /// Stable string identifier for this persona
    pub fn key(&self) -> &'static str {
        match self {
            Persona::Facilitator => "facilitator",
            Persona::Analyst => "analyst",
            Persona::Visionary => "visionary",
            Persona::Skeptic => "skeptic",
            Persona::Pragmatist => "pragmatist",
        }
    }

    /// Human-readable name used in transcripts
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Facilitator => "Facilitator",
            Persona::Analyst => "Analyst",
            Persona::Visionary => "Visionary",
            Persona::Skeptic => "Skeptic",
            Persona::Pragmatist => "Pragmatist",
        }
    }

    /// One-line description of the persona's role in the discussion
    pub fn role(&self) -> &'static str {
        match self {
            Persona::Facilitator => "guides the conversation and draws out quieter voices",
            Persona::Analyst => "structures the problem and reasons from evidence",
            Persona::Visionary => "explores ambitious possibilities beyond the obvious",
            Persona::Skeptic => "stress-tests claims and surfaces hidden risks",
            Persona::Pragmatist => "focuses on what can actually be done, and at what cost",
        }
    }

    /// Fixed instruction template prepended to every prompt for this persona
    pub fn instruction(&self) -> &'static str {
        match self {
            Persona::Facilitator => {
                r#"You are the Facilitator in a group discussion.
Keep the conversation productive and inclusive. Summarize where the group
stands when helpful, connect points made by different participants, and ask
questions that move the discussion forward. Stay neutral on the substance."#
            }
            Persona::Analyst => {
                r#"You are the Analyst in a group discussion.
Break the topic into its component parts. Reason step by step, cite the
evidence behind your claims, and be explicit about uncertainty. Prefer
precision over rhetoric."#
            }
            Persona::Visionary => {
                r#"You are the Visionary in a group discussion.
Look past the immediate constraints and explore where the topic could lead.
Propose ambitious directions others have not considered, and explain what
would make them possible."#
            }
            Persona::Skeptic => {
                r#"You are the Skeptic in a group discussion.
Challenge assumptions that others take for granted. Point out weak evidence,
failure modes, and second-order effects. Be constructive: every objection
should sharpen the group's thinking, not shut it down."#
            }
            Persona::Pragmatist => {
                r#"You are the Pragmatist in a group discussion.
Bring ideas down to earth. Weigh cost, effort, and feasibility, and say
plainly what you would do first and why. Favor small concrete steps over
grand plans."#
            }
        }
    }

    /// All registered personas, in canonical order
    pub fn all() -> &'static [Persona] {
        &[
            Persona::Facilitator,
            Persona::Analyst,
            Persona::Visionary,
            Persona::Skeptic,
            Persona::Pragmatist,
        ]
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Persona {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facilitator" => Ok(Persona::Facilitator),
            "analyst" => Ok(Persona::Analyst),
            "visionary" => Ok(Persona::Visionary),
            "skeptic" => Ok(Persona::Skeptic),
            "pragmatist" => Ok(Persona::Pragmatist),
            other => Err(DomainError::UnknownPersona(other.to_string())),
        }
    }
}

impl Serialize for Persona {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Persona {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
