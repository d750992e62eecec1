//! Fairness selection
//!
//! A greedy load balancer, not strict round robin: each turn it picks the
//! personas with the fewest completed responses so far. Ties resolve in the
//! order the participants were registered (stable sort), so the rotation is
//! deterministic. Over many turns participation converges toward uniform,
//! though short-run repeats are possible while counts tie.

use crate::discussion::score::ParticipationScore;
use crate::persona::Persona;
use std::collections::HashMap;

/// Select up to `fan_out` least-active participants to respond next.
///
/// Participants with no score entry count as zero responses. The returned
/// set preserves rank order (least active first).
pub fn select_responders(
    participants: &[Persona],
    scores: &HashMap<Persona, ParticipationScore>,
    fan_out: usize,
) -> Vec<Persona> {
    let mut ranked: Vec<Persona> = participants.to_vec();
    ranked.sort_by_key(|p| scores.get(p).map(|s| s.response_count).unwrap_or(0));
    ranked.truncate(fan_out);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(counts: &[(Persona, u32)]) -> HashMap<Persona, ParticipationScore> {
        counts
            .iter()
            .map(|&(p, n)| {
                let mut score = ParticipationScore::default();
                for _ in 0..n {
                    score.record_response(100);
                }
                (p, score)
            })
            .collect()
    }

    #[test]
    fn test_selects_least_active() {
        let participants = [Persona::Analyst, Persona::Visionary, Persona::Skeptic];
        let scores = scores(&[
            (Persona::Analyst, 4),
            (Persona::Visionary, 1),
            (Persona::Skeptic, 2),
        ]);

        let selected = select_responders(&participants, &scores, 2);
        assert_eq!(selected, vec![Persona::Visionary, Persona::Skeptic]);
    }

    #[test]
    fn test_ties_break_by_registration_order() {
        let participants = [Persona::Skeptic, Persona::Analyst, Persona::Visionary];
        let selected = select_responders(&participants, &HashMap::new(), 2);
        assert_eq!(selected, vec![Persona::Skeptic, Persona::Analyst]);
    }

    #[test]
    fn test_fan_out_capped_by_participant_count() {
        let participants = [Persona::Analyst, Persona::Skeptic];
        let selected = select_responders(&participants, &HashMap::new(), 5);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_spread_stays_bounded_over_many_turns() {
        // Simulate 200 turns of k=2 selection over 5 participants with every
        // selected persona completing its response. The max-min spread of
        // response counts must stay bounded (greedy least-first keeps it at
        // most 1), not diverge.
        let participants = Persona::all().to_vec();
        let mut scores: HashMap<Persona, ParticipationScore> = participants
            .iter()
            .map(|&p| (p, ParticipationScore::default()))
            .collect();

        for _ in 0..200 {
            for persona in select_responders(&participants, &scores, 2) {
                scores
                    .get_mut(&persona)
                    .expect("selected persona is a participant")
                    .record_response(120);
            }
        }

        let counts: Vec<u32> = participants
            .iter()
            .map(|p| scores[p].response_count)
            .collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1, "spread diverged: {:?}", counts);
    }
}
