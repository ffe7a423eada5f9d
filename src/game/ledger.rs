//! Account ledger
//!
//! The balance-mutation authority. Every debit and credit holds the
//! account's map entry for the whole check-then-mutate, so balances never go
//! negative and concurrent operations on one account serialize.

use crate::errors::{GameError, GameResult};
use crate::game::types::AccountId;
use dashmap::DashMap;

/// Atomic balance operations over integer monetary units.
pub struct Ledger {
    balances: DashMap<AccountId, u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Register an account with an opening balance. Called by the account
    /// directory; re-opening an existing account is a no-op.
    pub fn open_account(&self, account: AccountId, opening_balance: u64) {
        self.balances.entry(account).or_insert(opening_balance);
    }

    pub fn balance(&self, account: AccountId) -> GameResult<u64> {
        self.balances
            .get(&account)
            .map(|b| *b)
            .ok_or_else(|| GameError::UnknownAccount(account.to_string()))
    }

    /// Atomic check-then-decrement. Returns the remaining balance.
    pub fn debit(&self, account: AccountId, amount: u64) -> GameResult<u64> {
        let mut balance = self
            .balances
            .get_mut(&account)
            .ok_or_else(|| GameError::UnknownAccount(account.to_string()))?;
        if *balance < amount {
            return Err(GameError::InsufficientFunds);
        }
        *balance -= amount;
        Ok(*balance)
    }

    /// Atomic increment. Returns the new balance.
    pub fn credit(&self, account: AccountId, amount: u64) -> GameResult<u64> {
        let mut balance = self
            .balances
            .get_mut(&account)
            .ok_or_else(|| GameError::UnknownAccount(account.to_string()))?;
        *balance = balance.saturating_add(amount);
        Ok(*balance)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_debit_and_credit_roundtrip() {
        let ledger = Ledger::new();
        ledger.open_account(AccountId(1), 1_000);

        assert_eq!(ledger.debit(AccountId(1), 100).unwrap(), 900);
        assert_eq!(ledger.credit(AccountId(1), 200).unwrap(), 1_100);
        assert_eq!(ledger.balance(AccountId(1)).unwrap(), 1_100);
    }

    #[test]
    fn test_debit_rejects_overdraft() {
        let ledger = Ledger::new();
        ledger.open_account(AccountId(1), 20);

        assert_eq!(
            ledger.debit(AccountId(1), 100),
            Err(GameError::InsufficientFunds)
        );
        // Balance untouched by the rejected debit.
        assert_eq!(ledger.balance(AccountId(1)).unwrap(), 20);
    }

    #[test]
    fn test_unknown_account_is_rejected() {
        let ledger = Ledger::new();
        assert!(matches!(
            ledger.debit(AccountId(9), 1),
            Err(GameError::UnknownAccount(_))
        ));
        assert!(matches!(
            ledger.credit(AccountId(9), 1),
            Err(GameError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_reopening_account_keeps_balance() {
        let ledger = Ledger::new();
        ledger.open_account(AccountId(1), 500);
        ledger.open_account(AccountId(1), 0);
        assert_eq!(ledger.balance(AccountId(1)).unwrap(), 500);
    }

    #[test]
    fn test_concurrent_debits_never_go_negative() {
        let ledger = Arc::new(Ledger::new());
        ledger.open_account(AccountId(1), 100);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    let mut wins = 0u32;
                    for _ in 0..100 {
                        if ledger.debit(AccountId(1), 10).is_ok() {
                            wins += 1;
                        }
                    }
                    wins
                })
            })
            .collect();

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        // Exactly ten debits of 10 fit into a balance of 100.
        assert_eq!(total, 10);
        assert_eq!(ledger.balance(AccountId(1)).unwrap(), 0);
    }
}
