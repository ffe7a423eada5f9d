//! Game session facade
//!
//! The single surface external callers consume: round state, bet placement,
//! balances, history, and the recharge workflow. Wires the clock, ledger,
//! bet store, and settlement engine together and owns no game rules of its
//! own beyond request validation.

use crate::config::RoundConfig;
use crate::errors::{GameError, GameResult};
use crate::game::accounts::AccountDirectory;
use crate::game::bets::BetStore;
use crate::game::clock::RoundClock;
use crate::game::history::RoundHistory;
use crate::game::ledger::Ledger;
use crate::game::recharge::RechargeBook;
use crate::game::rng::OutcomeGenerator;
use crate::game::settlement::{ReconciliationEntry, SettlementEngine};
use crate::game::time::{TimeSource, WallClock};
use crate::game::types::{
    Account, AccountId, Bet, Color, Recharge, RechargeId, RechargeStatus, RoundId, RoundSummary,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// The active round as reported to callers, with its live bets.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRound {
    pub id: RoundId,
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    pub bets: Vec<Bet>,
}

/// Combined view for the state query: live round plus last settled round.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub round: ActiveRound,
    pub last_round: Option<RoundSummary>,
}

pub struct GameSession {
    accounts: AccountDirectory,
    ledger: Arc<Ledger>,
    bets: Arc<BetStore>,
    clock: RoundClock,
    history: Arc<RoundHistory>,
    settlement: Arc<SettlementEngine>,
    recharges: RechargeBook,
    time: Arc<dyn TimeSource>,
}

impl GameSession {
    pub fn new(
        round_config: &RoundConfig,
        time: Arc<dyn TimeSource>,
        generator: OutcomeGenerator,
    ) -> Self {
        let ledger = Arc::new(Ledger::new());
        let bets = Arc::new(BetStore::new());
        let history = Arc::new(RoundHistory::new());
        let settlement = Arc::new(SettlementEngine::new(
            Arc::new(generator),
            Arc::clone(&bets),
            Arc::clone(&ledger),
            Arc::clone(&history),
            Arc::clone(&time),
        ));
        let clock = RoundClock::new(
            round_config.duration_secs,
            Arc::clone(&time),
            Arc::clone(&settlement),
        );

        Self {
            accounts: AccountDirectory::new(),
            ledger,
            bets,
            clock,
            history,
            settlement,
            recharges: RechargeBook::new(),
            time,
        }
    }

    /// Production wiring: wall clock, entropy-seeded generator (or a fixed
    /// seed when the config asks for one).
    pub fn with_defaults(round_config: &RoundConfig) -> Self {
        let generator = match round_config.rng_seed {
            Some(seed) => OutcomeGenerator::seeded(seed),
            None => OutcomeGenerator::new(),
        };
        Self::new(round_config, Arc::new(WallClock), generator)
    }

    /// Current round, timer, live bets, and the last-round summary. Runs the
    /// lazy expiry check first, so an expired round settles before the state
    /// is reported.
    pub fn state(&self) -> GameState {
        let tick = self.clock.current_round();
        GameState {
            round: ActiveRound {
                id: tick.round.id,
                remaining_seconds: tick.remaining_seconds,
                duration_seconds: tick.round.duration_secs,
                bets: self.bets.bets_for_round(tick.round.id),
            },
            last_round: self.history.last_round(),
        }
    }

    /// Validate, check the window, then run the debit+insert unit.
    pub fn place_bet(
        &self,
        account_id: AccountId,
        color: Color,
        amount: u64,
        number: Option<u8>,
    ) -> GameResult<Bet> {
        if amount == 0 {
            return Err(GameError::InvalidBet("stake must be positive".to_string()));
        }
        if let Some(number) = number {
            if number > 9 {
                return Err(GameError::InvalidBet(
                    "number must be between 0 and 9".to_string(),
                ));
            }
        }

        let round_id = self.clock.betting_round()?;
        let bet = self.bets.place(
            round_id,
            account_id,
            color,
            number,
            amount,
            self.time.now_ms(),
            &self.ledger,
        )?;
        debug!(round = %round_id, account = %account_id, amount, %color, "bet placed");
        Ok(bet)
    }

    pub fn register(&self, username: &str) -> GameResult<Account> {
        self.accounts.register(username, &self.ledger)
    }

    pub fn resolve_account(&self, username: &str) -> GameResult<AccountId> {
        self.accounts.resolve(username)
    }

    pub fn username(&self, id: AccountId) -> Option<String> {
        self.accounts.username(id)
    }

    pub fn balance(&self, account_id: AccountId) -> GameResult<u64> {
        self.ledger.balance(account_id)
    }

    /// Full bet history for an account, most recent round first.
    pub fn bet_history(&self, account_id: AccountId) -> Vec<Bet> {
        self.bets.history_for_account(account_id)
    }

    /// All settled rounds with their outcomes, most recent first.
    pub fn settled_rounds(&self) -> Vec<RoundSummary> {
        self.history.settled_rounds()
    }

    pub fn request_recharge(
        &self,
        account_id: AccountId,
        amount: u64,
        trn: &str,
    ) -> GameResult<Recharge> {
        if amount == 0 {
            return Err(GameError::Validation(
                "recharge amount must be positive".to_string(),
            ));
        }
        if trn.trim().is_empty() {
            return Err(GameError::Validation(
                "transaction reference required".to_string(),
            ));
        }
        Ok(self
            .recharges
            .request(account_id, amount, trn.trim().to_string(), self.time.now_ms()))
    }

    /// `applyApprovedRecharge` contract: credits the ledger at most once per
    /// recharge.
    pub fn approve_recharge(&self, id: RechargeId) -> GameResult<Recharge> {
        self.recharges.approve(id, &self.ledger)
    }

    pub fn recharges(&self, status: Option<RechargeStatus>) -> Vec<Recharge> {
        self.recharges.list(status)
    }

    pub fn recharges_for_account(&self, account_id: AccountId) -> Vec<Recharge> {
        self.recharges.for_account(account_id)
    }

    /// Payouts parked after a settlement failure, for operator review.
    pub fn pending_reconciliation(&self) -> Vec<ReconciliationEntry> {
        self.settlement.pending_reconciliation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::time::ManualClock;
    use crate::game::types::Outcome;

    fn session_fixture(outcome: Outcome) -> (GameSession, Arc<ManualClock>) {
        let time = Arc::new(ManualClock::new(1_000_000));
        let config = RoundConfig {
            duration_secs: 180,
            rng_seed: None,
        };
        let session = GameSession::new(
            &config,
            time.clone() as Arc<dyn TimeSource>,
            OutcomeGenerator::fixed(outcome),
        );
        (session, time)
    }

    fn funded_account(session: &GameSession, username: &str, balance: u64) -> AccountId {
        let account = session.register(username).unwrap();
        let recharge = session
            .request_recharge(account.id, balance, "TRN-SETUP")
            .unwrap();
        session.approve_recharge(recharge.id).unwrap();
        account.id
    }

    #[test]
    fn test_state_reports_live_bets() {
        let (session, _time) = session_fixture(Outcome {
            winning_color: Color::Red,
            winning_number: 0,
        });
        let account = funded_account(&session, "alice", 1_000);

        session.place_bet(account, Color::Red, 100, None).unwrap();
        let state = session.state();

        assert_eq!(state.round.bets.len(), 1);
        assert!(state.last_round.is_none());
        assert_eq!(state.round.remaining_seconds, 180);
    }

    #[test]
    fn test_zero_stake_rejected_before_any_mutation() {
        let (session, _time) = session_fixture(Outcome {
            winning_color: Color::Red,
            winning_number: 0,
        });
        let account = funded_account(&session, "alice", 1_000);

        assert!(matches!(
            session.place_bet(account, Color::Red, 0, None),
            Err(GameError::InvalidBet(_))
        ));
        assert!(matches!(
            session.place_bet(account, Color::Red, 10, Some(12)),
            Err(GameError::InvalidBet(_))
        ));
        assert_eq!(session.balance(account).unwrap(), 1_000);
        assert!(session.state().round.bets.is_empty());
    }

    #[test]
    fn test_window_closed_after_expiry_before_settlement() {
        let (session, time) = session_fixture(Outcome {
            winning_color: Color::Red,
            winning_number: 0,
        });
        let account = funded_account(&session, "alice", 1_000);

        time.advance_secs(180);
        assert_eq!(
            session.place_bet(account, Color::Red, 100, None),
            Err(GameError::WindowClosed)
        );
    }
}
