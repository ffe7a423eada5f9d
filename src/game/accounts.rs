//! Account directory
//!
//! Username to account-id resolution. This is the credential-free identity
//! surface the game consumes; registration and authentication proper live in
//! an external flow.

use crate::errors::{GameError, GameResult};
use crate::game::ledger::Ledger;
use crate::game::types::{Account, AccountId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct AccountDirectory {
    by_name: DashMap<String, AccountId>,
    accounts: DashMap<AccountId, Account>,
    next_id: AtomicU64,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create an account with a zero opening balance. The name entry is held
    /// for the duplicate check and the insert, so two concurrent
    /// registrations of one username cannot both succeed.
    pub fn register(&self, username: &str, ledger: &Ledger) -> GameResult<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GameError::Validation("username required".to_string()));
        }

        match self.by_name.entry(username.to_string()) {
            Entry::Occupied(_) => Err(GameError::AccountExists(username.to_string())),
            Entry::Vacant(slot) => {
                let id = AccountId(self.next_id.fetch_add(1, Ordering::SeqCst));
                let account = Account {
                    id,
                    username: username.to_string(),
                };
                self.accounts.insert(id, account.clone());
                ledger.open_account(id, 0);
                slot.insert(id);
                Ok(account)
            }
        }
    }

    /// `resolveAccount` contract: username to id, or UnknownAccount.
    pub fn resolve(&self, username: &str) -> GameResult<AccountId> {
        self.by_name
            .get(username)
            .map(|id| *id)
            .ok_or_else(|| GameError::UnknownAccount(username.to_string()))
    }

    pub fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|a| a.clone())
    }

    pub fn username(&self, id: AccountId) -> Option<String> {
        self.accounts.get(&id).map(|a| a.username.clone())
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}
