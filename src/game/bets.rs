//! Bet store
//!
//! Durable record of stakes per round. Enforces one bet per
//! (round, account) and makes duplicate-check, stake debit, and insert one
//! atomic unit: the round's book entry stays locked for the whole sequence,
//! so a failed debit leaves no bet behind and concurrent placements for the
//! same account cannot interleave.

use crate::errors::{GameError, GameResult};
use crate::game::ledger::Ledger;
use crate::game::types::{AccountId, Bet, BetId, Color, RoundId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct BetStore {
    by_round: DashMap<RoundId, Vec<Bet>>,
    /// Rounds each account has bet in, in placement order. Round ids are
    /// monotonic, so reversing this gives most-recent-first history.
    by_account: DashMap<AccountId, Vec<RoundId>>,
    next_id: AtomicU64,
}

impl BetStore {
    pub fn new() -> Self {
        Self {
            by_round: DashMap::new(),
            by_account: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Place a stake: duplicate check, ledger debit, insert. Rejecting a
    /// duplicate happens before the debit; an insufficient balance leaves no
    /// bet record.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        &self,
        round_id: RoundId,
        account_id: AccountId,
        color: Color,
        number: Option<u8>,
        amount: u64,
        now_ms: u64,
        ledger: &Ledger,
    ) -> GameResult<Bet> {
        let mut book = self.by_round.entry(round_id).or_default();
        if book.iter().any(|bet| bet.account_id == account_id) {
            return Err(GameError::DuplicateBet);
        }

        ledger.debit(account_id, amount)?;

        let bet = Bet {
            id: BetId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            round_id,
            account_id,
            color,
            number,
            amount,
            is_winner: None,
            multiplier: None,
            placed_at_ms: now_ms,
        };
        book.push(bet.clone());
        drop(book);

        self.by_account
            .entry(account_id)
            .or_default()
            .push(round_id);
        Ok(bet)
    }

    /// All bets placed in a round, in placement order.
    pub fn bets_for_round(&self, round_id: RoundId) -> Vec<Bet> {
        self.by_round
            .get(&round_id)
            .map(|book| book.clone())
            .unwrap_or_default()
    }

    /// Write-once outcome fields, set during settlement of the bet's round.
    pub fn record_outcome(
        &self,
        round_id: RoundId,
        bet_id: BetId,
        is_winner: bool,
        multiplier: u32,
    ) -> GameResult<()> {
        let mut book = self.by_round.get_mut(&round_id).ok_or(GameError::UnknownBet {
            round: round_id,
            bet: bet_id,
        })?;
        let bet = book
            .iter_mut()
            .find(|bet| bet.id == bet_id)
            .ok_or(GameError::UnknownBet {
                round: round_id,
                bet: bet_id,
            })?;
        if bet.is_winner.is_some() {
            return Err(GameError::OutcomeAlreadyRecorded(bet_id));
        }
        bet.is_winner = Some(is_winner);
        bet.multiplier = Some(multiplier);
        Ok(())
    }

    /// Full bet history for an account, most recent round first.
    pub fn history_for_account(&self, account_id: AccountId) -> Vec<Bet> {
        let rounds = self
            .by_account
            .get(&account_id)
            .map(|rounds| rounds.clone())
            .unwrap_or_default();

        let mut history = Vec::with_capacity(rounds.len());
        for round_id in rounds.iter().rev() {
            if let Some(book) = self.by_round.get(round_id) {
                if let Some(bet) = book.iter().find(|bet| bet.account_id == account_id) {
                    history.push(bet.clone());
                }
            }
        }
        history
    }
}

impl Default for BetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_ledger(account: AccountId, balance: u64) -> Ledger {
        let ledger = Ledger::new();
        ledger.open_account(account, balance);
        ledger
    }

    #[test]
    fn test_place_debits_and_records() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 1_000);
        let store = BetStore::new();

        let bet = store
            .place(RoundId(10), account, Color::Red, None, 100, 5, &ledger)
            .unwrap();

        assert_eq!(bet.amount, 100);
        assert_eq!(ledger.balance(account).unwrap(), 900);
        assert_eq!(store.bets_for_round(RoundId(10)).len(), 1);
    }

    #[test]
    fn test_duplicate_bet_rejected_before_debit() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 1_000);
        let store = BetStore::new();

        store
            .place(RoundId(10), account, Color::Red, None, 100, 5, &ledger)
            .unwrap();
        let second = store.place(RoundId(10), account, Color::Green, Some(3), 50, 6, &ledger);

        assert_eq!(second, Err(GameError::DuplicateBet));
        // Only the first stake was taken.
        assert_eq!(ledger.balance(account).unwrap(), 900);
        assert_eq!(store.bets_for_round(RoundId(10)).len(), 1);
    }

    #[test]
    fn test_same_account_may_bet_in_later_rounds() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 1_000);
        let store = BetStore::new();

        store
            .place(RoundId(10), account, Color::Red, None, 100, 5, &ledger)
            .unwrap();
        store
            .place(RoundId(11), account, Color::Green, None, 100, 6, &ledger)
            .unwrap();

        assert_eq!(ledger.balance(account).unwrap(), 800);
    }

    #[test]
    fn test_failed_debit_leaves_no_record() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 20);
        let store = BetStore::new();

        let result = store.place(RoundId(10), account, Color::Red, None, 100, 5, &ledger);

        assert_eq!(result, Err(GameError::InsufficientFunds));
        assert!(store.bets_for_round(RoundId(10)).is_empty());
        assert!(store.history_for_account(account).is_empty());
        assert_eq!(ledger.balance(account).unwrap(), 20);
    }

    #[test]
    fn test_record_outcome_is_write_once() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 1_000);
        let store = BetStore::new();

        let bet = store
            .place(RoundId(10), account, Color::Red, None, 100, 5, &ledger)
            .unwrap();

        store
            .record_outcome(RoundId(10), bet.id, true, 2)
            .unwrap();
        assert_eq!(
            store.record_outcome(RoundId(10), bet.id, false, 0),
            Err(GameError::OutcomeAlreadyRecorded(bet.id))
        );

        let stored = &store.bets_for_round(RoundId(10))[0];
        assert_eq!(stored.is_winner, Some(true));
        assert_eq!(stored.multiplier, Some(2));
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let account = AccountId(1);
        let ledger = funded_ledger(account, 1_000);
        let store = BetStore::new();

        store
            .place(RoundId(10), account, Color::Red, None, 10, 1, &ledger)
            .unwrap();
        store
            .place(RoundId(20), account, Color::Green, None, 10, 2, &ledger)
            .unwrap();
        store
            .place(RoundId(30), account, Color::Violet, None, 10, 3, &ledger)
            .unwrap();

        let history = store.history_for_account(account);
        let rounds: Vec<u64> = history.iter().map(|bet| bet.round_id.0).collect();
        assert_eq!(rounds, vec![30, 20, 10]);
    }

    #[test]
    fn test_concurrent_placements_single_account_single_winner() {
        use std::sync::Arc;

        let account = AccountId(1);
        let ledger = Arc::new(funded_ledger(account, 1_000));
        let store = Arc::new(BetStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .place(RoundId(10), account, Color::Red, None, 100, 5, &ledger)
                        .is_ok()
                })
            })
            .collect();

        let placed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(placed, 1);
        assert_eq!(store.bets_for_round(RoundId(10)).len(), 1);
        assert_eq!(ledger.balance(account).unwrap(), 900);
    }
}
