//! Domain layer for roundtable
//!
//! This crate contains the core business logic, entities, and value objects
//! for throttled multi-persona discussions. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Discussion
//!
//! A discussion is a bounded, stateful exchange between a human participant
//! and a closed set of agent personas on a single topic:
//!
//! - **Transcript**: append-only sequence of immutable turns
//! - **Participation scores**: per-persona counters driving fairness selection
//! - **Fairness selection**: the least-active personas respond to each turn
//!
//! ## Persona
//!
//! Personas are a closed registry (enum, not string lookup): each variant
//! carries its display name, role, and instruction template.

pub mod core;
pub mod discussion;
pub mod extraction;
pub mod persona;
pub mod prompt;

// Re-export commonly used types
pub use core::{error::DomainError, topic::Topic};
pub use discussion::{
    entities::{DiscussionSession, DiscussionStatus},
    fairness::select_responders,
    report::{
        ConsensusAnalysis, DiscussionMetrics, DiscussionOpened, FinalReport, ResponderFailure,
        TurnOutcome,
    },
    score::ParticipationScore,
    turn::{Turn, TurnKind},
};
pub use extraction::{ExtractError, extract_json_object};
pub use persona::Persona;
pub use prompt::PromptTemplate;
