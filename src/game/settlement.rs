//! Settlement engine
//!
//! Runs once per round when the countdown expires: draws the outcome, marks
//! every bet, pays the winners. Exclusivity comes from the round clock's
//! transition lock; the settled-round guard here makes retries idempotent.

use crate::game::bets::BetStore;
use crate::game::history::RoundHistory;
use crate::game::ledger::Ledger;
use crate::game::rng::OutcomeGenerator;
use crate::game::time::TimeSource;
use crate::game::types::{
    AccountId, Bet, BetId, Color, Outcome, RoundId, RoundSummary, COLOR_MATCH_MULTIPLIER,
    NUMBER_MATCH_MULTIPLIER, VIOLET_MATCH_MULTIPLIER,
};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Evaluate one bet against the round outcome. A number match takes
/// precedence; a bet whose number misses can still win on color.
pub fn evaluate(bet: &Bet, outcome: &Outcome) -> (bool, u32) {
    if let Some(number) = bet.number {
        if number == outcome.winning_number {
            return (true, NUMBER_MATCH_MULTIPLIER);
        }
    }
    if bet.color == outcome.winning_color {
        let multiplier = if outcome.winning_color == Color::Violet {
            VIOLET_MATCH_MULTIPLIER
        } else {
            COLOR_MATCH_MULTIPLIER
        };
        return (true, multiplier);
    }
    (false, 0)
}

/// A payout that could not be applied, parked for manual reconciliation.
/// Never dropped silently: the bet stays unmarked so a retry can not pay
/// twice and an operator can see exactly what is owed.
#[derive(Debug, Clone)]
pub struct ReconciliationEntry {
    pub round_id: RoundId,
    pub bet_id: BetId,
    pub account_id: AccountId,
    pub owed: u64,
    pub reason: String,
}

pub struct SettlementEngine {
    generator: Arc<OutcomeGenerator>,
    bets: Arc<BetStore>,
    ledger: Arc<Ledger>,
    history: Arc<RoundHistory>,
    reconciliation: Mutex<Vec<ReconciliationEntry>>,
    time: Arc<dyn TimeSource>,
}

impl SettlementEngine {
    pub fn new(
        generator: Arc<OutcomeGenerator>,
        bets: Arc<BetStore>,
        ledger: Arc<Ledger>,
        history: Arc<RoundHistory>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            generator,
            bets,
            ledger,
            history,
            reconciliation: Mutex::new(Vec::new()),
            time,
        }
    }

    /// Settle a round. The caller must hold the round clock's transition
    /// lock; a round that already has a summary returns it unchanged, with
    /// no redraw and no further credits.
    pub fn settle(&self, round_id: RoundId) -> RoundSummary {
        if let Some(existing) = self.history.get(round_id) {
            return existing;
        }

        // One draw per round, reused for every bet below.
        let outcome = self.generator.draw();
        let bets = self.bets.bets_for_round(round_id);

        for bet in &bets {
            let (is_winner, multiplier) = evaluate(bet, &outcome);

            if is_winner {
                let payout = bet.amount * u64::from(multiplier);
                if let Err(err) = self.ledger.credit(bet.account_id, payout) {
                    // Credit first, mark second: a bet is never marked winner
                    // without its payout applied.
                    error!(
                        round = %round_id,
                        bet = %bet.id,
                        account = %bet.account_id,
                        %err,
                        "payout failed; bet parked for reconciliation"
                    );
                    self.park(bet, round_id, payout, err.to_string());
                    continue;
                }
            }

            if let Err(err) = self.bets.record_outcome(round_id, bet.id, is_winner, multiplier) {
                error!(
                    round = %round_id,
                    bet = %bet.id,
                    %err,
                    "outcome write failed after payout; bet parked for reconciliation"
                );
                self.park(bet, round_id, 0, err.to_string());
            }
        }

        let settled = self.bets.bets_for_round(round_id);
        let winners = settled
            .iter()
            .filter(|bet| bet.is_winner == Some(true))
            .count();
        let summary = RoundSummary {
            round_id,
            winning_color: outcome.winning_color,
            winning_number: outcome.winning_number,
            bets: settled,
            settled_at_ms: self.time.now_ms(),
        };
        self.history.record(summary.clone());

        info!(
            round = %round_id,
            color = %outcome.winning_color,
            number = outcome.winning_number,
            bets = summary.bets.len(),
            winners,
            "round settled"
        );
        summary
    }

    fn park(&self, bet: &Bet, round_id: RoundId, owed: u64, reason: String) {
        self.reconciliation
            .lock()
            .unwrap()
            .push(ReconciliationEntry {
                round_id,
                bet_id: bet.id,
                account_id: bet.account_id,
                owed,
                reason,
            });
    }

    /// Bets awaiting manual reconciliation after a failed payout or outcome
    /// write.
    pub fn pending_reconciliation(&self) -> Vec<ReconciliationEntry> {
        self.reconciliation.lock().unwrap().clone()
    }
}
