//! Participation scores
//!
//! Each persona's score is updated only by its own successful responses,
//! together with the corresponding turn append. The `response_count` is what
//! fairness selection ranks on; `average_length` and `engagement_score` are
//! reported in the final metrics.

use serde::{Deserialize, Serialize};

/// Response length (chars) treated as a fully-engaged contribution.
const BASELINE_RESPONSE_LEN: f64 = 320.0;

/// Per-persona participation bookkeeping (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipationScore {
    /// Number of successful fairness-selected (or focused) responses
    pub response_count: u32,
    /// Running average response length in characters
    pub average_length: f64,
    /// Activity weighted by how substantial the responses are
    pub engagement_score: f64,
}

impl ParticipationScore {
    /// Record one successful response of the given length.
    pub fn record_response(&mut self, length: usize) {
        let n = self.response_count as f64;
        self.average_length = (self.average_length * n + length as f64) / (n + 1.0);
        self.response_count += 1;
        let depth = (self.average_length / BASELINE_RESPONSE_LEN).clamp(0.25, 1.5);
        self.engagement_score = self.response_count as f64 * depth;
    }
}
