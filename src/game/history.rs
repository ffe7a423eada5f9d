//! Settled-round history
//!
//! Holds the last-round summary cache plus every settled round for the
//! history queries. A summary present here is the idempotency witness that
//! its round has already been settled.

use crate::game::types::{RoundId, RoundSummary};
use std::sync::RwLock;

pub struct RoundHistory {
    /// Settled rounds in settlement order; reads reverse for
    /// most-recent-first.
    settled: RwLock<Vec<RoundSummary>>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self {
            settled: RwLock::new(Vec::new()),
        }
    }

    pub fn record(&self, summary: RoundSummary) {
        self.settled.write().unwrap().push(summary);
    }

    /// The cached "last round" shown next to the live round.
    pub fn last_round(&self) -> Option<RoundSummary> {
        self.settled.read().unwrap().last().cloned()
    }

    pub fn get(&self, round_id: RoundId) -> Option<RoundSummary> {
        self.settled
            .read()
            .unwrap()
            .iter()
            .find(|summary| summary.round_id == round_id)
            .cloned()
    }

    /// All settled rounds, most recent first.
    pub fn settled_rounds(&self) -> Vec<RoundSummary> {
        let rounds = self.settled.read().unwrap();
        rounds.iter().rev().cloned().collect()
    }
}

impl Default for RoundHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Color;

    fn summary(round: u64) -> RoundSummary {
        RoundSummary {
            round_id: RoundId(round),
            winning_color: Color::Red,
            winning_number: 5,
            bets: vec![],
            settled_at_ms: round,
        }
    }

    #[test]
    fn test_last_round_tracks_latest_settlement() {
        let history = RoundHistory::new();
        assert!(history.last_round().is_none());

        history.record(summary(1));
        history.record(summary(2));
        assert_eq!(history.last_round().unwrap().round_id, RoundId(2));
    }

    #[test]
    fn test_settled_rounds_are_most_recent_first() {
        let history = RoundHistory::new();
        history.record(summary(1));
        history.record(summary(2));
        history.record(summary(3));

        let ids: Vec<u64> = history
            .settled_rounds()
            .iter()
            .map(|s| s.round_id.0)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_get_finds_specific_round() {
        let history = RoundHistory::new();
        history.record(summary(7));
        assert!(history.get(RoundId(7)).is_some());
        assert!(history.get(RoundId(8)).is_none());
    }
}
