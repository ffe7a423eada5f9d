//! Recharge workflow
//!
//! Deposit requests carrying an external payment reference. An admin
//! approval credits the ledger; the PENDING -> APPROVED transition is the
//! idempotency gate, held under the entry lock together with the credit.

use crate::errors::{GameError, GameResult};
use crate::game::ledger::Ledger;
use crate::game::types::{AccountId, Recharge, RechargeId, RechargeStatus};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

pub struct RechargeBook {
    entries: DashMap<RechargeId, Recharge>,
    next_id: AtomicU64,
}

impl RechargeBook {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn request(
        &self,
        account_id: AccountId,
        amount: u64,
        trn: String,
        now_ms: u64,
    ) -> Recharge {
        let recharge = Recharge {
            id: RechargeId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            account_id,
            amount,
            trn,
            status: RechargeStatus::Pending,
            created_at_ms: now_ms,
        };
        self.entries.insert(recharge.id, recharge.clone());
        recharge
    }

    /// Approve once: the status check and the ledger credit happen while the
    /// entry is held, so a second approval of the same recharge can never
    /// credit again.
    pub fn approve(&self, id: RechargeId, ledger: &Ledger) -> GameResult<Recharge> {
        let mut entry = self
            .entries
            .get_mut(&id)
            .ok_or(GameError::UnknownRecharge(id))?;
        if entry.status == RechargeStatus::Approved {
            return Err(GameError::RechargeAlreadyApproved(id));
        }

        ledger.credit(entry.account_id, entry.amount)?;
        entry.status = RechargeStatus::Approved;
        info!(
            recharge = %id,
            account = %entry.account_id,
            amount = entry.amount,
            "recharge approved and credited"
        );
        Ok(entry.clone())
    }

    /// Recharges filtered by status, newest first.
    pub fn list(&self, status: Option<RechargeStatus>) -> Vec<Recharge> {
        let mut recharges: Vec<Recharge> = self
            .entries
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .map(|entry| entry.clone())
            .collect();
        recharges.sort_by(|a, b| b.id.cmp(&a.id));
        recharges
    }

    /// One account's recharges, newest first.
    pub fn for_account(&self, account_id: AccountId) -> Vec<Recharge> {
        let mut recharges: Vec<Recharge> = self
            .entries
            .iter()
            .filter(|entry| entry.account_id == account_id)
            .map(|entry| entry.clone())
            .collect();
        recharges.sort_by(|a, b| b.id.cmp(&a.id));
        recharges
    }
}

impl Default for RechargeBook {
    fn default() -> Self {
        Self::new()
    }
}
