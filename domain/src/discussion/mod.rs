//! Discussion domain
//!
//! Everything that makes up one group discussion: the session aggregate and
//! its state machine, immutable transcript turns, per-persona participation
//! scores, the fairness selector, and the exported result types.

pub mod entities;
pub mod fairness;
pub mod report;
pub mod score;
pub mod turn;

pub use entities::{DiscussionSession, DiscussionStatus};
pub use fairness::select_responders;
pub use report::{
    ConsensusAnalysis, DiscussionMetrics, DiscussionOpened, FinalReport, ResponderFailure,
    TurnOutcome,
};
pub use score::ParticipationScore;
pub use turn::{Turn, TurnKind};
