//! Round clock
//!
//! Owns the single active round: its start time, its fixed duration, and the
//! transition into settlement. The whole OPEN -> SETTLING -> SETTLED -> new
//! OPEN sequence runs under one mutex, so at most one caller performs the
//! transition per round and everyone else blocks until the fresh round is
//! open.

use crate::errors::{GameError, GameResult};
use crate::game::settlement::SettlementEngine;
use crate::game::time::TimeSource;
use crate::game::types::{Round, RoundId, RoundPhase};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Snapshot returned by the expiry check.
#[derive(Debug, Clone)]
pub struct RoundTick {
    pub round: Round,
    pub remaining_seconds: u64,
}

struct ClockState {
    current: Round,
}

pub struct RoundClock {
    state: Mutex<ClockState>,
    duration_secs: u64,
    time: Arc<dyn TimeSource>,
    settlement: Arc<SettlementEngine>,
}

impl RoundClock {
    pub fn new(
        duration_secs: u64,
        time: Arc<dyn TimeSource>,
        settlement: Arc<SettlementEngine>,
    ) -> Self {
        let now = time.now_ms();
        let first = Round {
            id: RoundId(now),
            started_at_ms: now,
            duration_secs,
            phase: RoundPhase::Open,
        };
        info!(round = %first.id, duration_secs, "opening first round");
        Self {
            state: Mutex::new(ClockState { current: first }),
            duration_secs,
            time,
            settlement,
        }
    }

    /// Time-derived id with a monotonic bump, so a settlement and reopen
    /// inside one millisecond can not reuse an id.
    fn next_round_id(last: RoundId, now_ms: u64) -> RoundId {
        RoundId(now_ms.max(last.0 + 1))
    }

    /// Expiry check plus snapshot. If the countdown has run out and the
    /// round is still OPEN, this caller settles it and opens the next round
    /// before reporting; concurrent callers wait on the lock and then see
    /// the new round.
    pub fn current_round(&self) -> RoundTick {
        let mut state = self.state.lock().unwrap();
        let now = self.time.now_ms();

        if state.current.remaining_seconds(now) <= 0 && state.current.phase == RoundPhase::Open {
            state.current.phase = RoundPhase::Settling;
            let expired = state.current.id;

            self.settlement.settle(expired);
            state.current.phase = RoundPhase::Settled;

            let reopened_at = self.time.now_ms();
            state.current = Round {
                id: Self::next_round_id(expired, reopened_at),
                started_at_ms: reopened_at,
                duration_secs: self.duration_secs,
                phase: RoundPhase::Open,
            };
            info!(settled = %expired, opened = %state.current.id, "round rotated");
        }

        let remaining = state
            .current
            .remaining_seconds(self.time.now_ms())
            .max(0) as u64;
        RoundTick {
            round: state.current.clone(),
            remaining_seconds: remaining,
        }
    }

    /// The round currently accepting bets. Rejects once remaining time hits
    /// zero even if settlement has not run yet; never triggers settlement
    /// itself.
    pub fn betting_round(&self) -> GameResult<RoundId> {
        let state = self.state.lock().unwrap();
        if state.current.accepts_bets(self.time.now_ms()) {
            Ok(state.current.id)
        } else {
            Err(GameError::WindowClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bets::BetStore;
    use crate::game::history::RoundHistory;
    use crate::game::ledger::Ledger;
    use crate::game::rng::OutcomeGenerator;
    use crate::game::time::ManualClock;
    use crate::game::types::{Color, Outcome};

    fn clock_fixture(duration_secs: u64) -> (RoundClock, Arc<ManualClock>, Arc<RoundHistory>) {
        let time: Arc<ManualClock> = Arc::new(ManualClock::new(1_000_000));
        let history = Arc::new(RoundHistory::new());
        let settlement = Arc::new(SettlementEngine::new(
            Arc::new(OutcomeGenerator::fixed(Outcome {
                winning_color: Color::Red,
                winning_number: 7,
            })),
            Arc::new(BetStore::new()),
            Arc::new(Ledger::new()),
            Arc::clone(&history),
            time.clone() as Arc<dyn TimeSource>,
        ));
        let clock = RoundClock::new(duration_secs, time.clone() as Arc<dyn TimeSource>, settlement);
        (clock, time, history)
    }

    #[test]
    fn test_fresh_round_reports_full_duration() {
        let (clock, _time, _history) = clock_fixture(180);
        let tick = clock.current_round();
        assert_eq!(tick.remaining_seconds, 180);
        assert_eq!(tick.round.phase, RoundPhase::Open);
    }

    #[test]
    fn test_expiry_settles_and_opens_fresh_round() {
        let (clock, time, history) = clock_fixture(180);
        let first = clock.current_round().round.id;

        time.advance_secs(180);
        let tick = clock.current_round();

        assert_ne!(tick.round.id, first);
        assert_eq!(tick.remaining_seconds, 180);
        assert!(history.get(first).is_some());
    }

    #[test]
    fn test_betting_round_closes_without_settling() {
        let (clock, time, history) = clock_fixture(180);
        let first = clock.current_round().round.id;

        time.advance_secs(180);
        // The betting path rejects immediately; settlement only happens on
        // the state path.
        assert_eq!(clock.betting_round(), Err(GameError::WindowClosed));
        assert!(history.get(first).is_none());
    }

    #[test]
    fn test_round_ids_never_collide() {
        // Reopening within the same millisecond must still advance the id.
        assert_eq!(
            RoundClock::next_round_id(RoundId(5_000), 5_000),
            RoundId(5_001)
        );
        assert_eq!(
            RoundClock::next_round_id(RoundId(5_000), 9_000),
            RoundId(9_000)
        );
    }

    #[test]
    fn test_concurrent_expiry_settles_exactly_once() {
        let (clock, time, history) = clock_fixture(60);
        let clock = Arc::new(clock);
        let first = clock.current_round().round.id;
        time.advance_secs(60);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || clock.current_round().round.id)
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            seen.insert(handle.join().unwrap());
        }

        // Every caller observed the same fresh round, and the expired round
        // settled exactly once.
        assert_eq!(seen.len(), 1);
        assert!(!seen.contains(&first));
        assert_eq!(history.settled_rounds().len(), 1);
    }
}
