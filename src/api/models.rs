//! API Response Models
//!
//! Request and response types for the HTTP surface. Internal epoch-ms
//! timestamps are rendered as RFC 3339 here; everything else mirrors the
//! game types.

use crate::game::types::{
    Bet, Color, Recharge, RechargeStatus, RoundSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn timestamp(ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_else(Utc::now)
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One bet as reported to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetView {
    pub id: u64,
    pub round_id: u64,
    pub account_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_winner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
    /// Credited amount; zero until the bet's round settles, and for losers.
    pub payout: u64,
    pub placed_at: DateTime<Utc>,
}

impl BetView {
    pub fn from_bet(bet: &Bet, username: Option<String>) -> Self {
        Self {
            id: bet.id.0,
            round_id: bet.round_id.0,
            account_id: bet.account_id.0,
            username,
            color: bet.color,
            number: bet.number,
            amount: bet.amount,
            is_winner: bet.is_winner,
            multiplier: bet.multiplier,
            payout: bet.payout(),
            placed_at: timestamp(bet.placed_at_ms),
        }
    }
}

/// The active round with its countdown and live bets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveRoundView {
    pub id: u64,
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    pub bets: Vec<BetView>,
}

/// A settled round with its drawn outcome and final bet list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummaryView {
    pub round_id: u64,
    pub winning_color: Color,
    pub winning_number: u8,
    pub bets: Vec<BetView>,
    pub settled_at: DateTime<Utc>,
}

impl RoundSummaryView {
    pub fn from_summary(summary: &RoundSummary, mut username: impl FnMut(&Bet) -> Option<String>) -> Self {
        Self {
            round_id: summary.round_id.0,
            winning_color: summary.winning_color,
            winning_number: summary.winning_number,
            bets: summary
                .bets
                .iter()
                .map(|bet| BetView::from_bet(bet, username(bet)))
                .collect(),
            settled_at: timestamp(summary.settled_at_ms),
        }
    }
}

/// GET /game response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub round: ActiveRoundView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_round: Option<RoundSummaryView>,
}

/// POST /game/bet request.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBetRequest {
    pub username: String,
    pub color: Color,
    pub amount: u64,
    #[serde(default)]
    pub number: Option<u8>,
}

/// POST /accounts request.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub username: String,
    pub balance: u64,
}

/// GET /accounts/:username/bets response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetHistoryResponse {
    pub username: String,
    pub bets: Vec<BetView>,
}

/// GET /rounds response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundsResponse {
    pub rounds: Vec<RoundSummaryView>,
}

/// POST /recharges request.
#[derive(Debug, Clone, Deserialize)]
pub struct RechargeRequest {
    pub username: String,
    pub amount: u64,
    /// External payment transaction reference.
    pub trn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargeView {
    pub id: u64,
    pub account_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub amount: u64,
    pub trn: String,
    pub status: RechargeStatus,
    pub created_at: DateTime<Utc>,
}

impl RechargeView {
    pub fn from_recharge(recharge: &Recharge, username: Option<String>) -> Self {
        Self {
            id: recharge.id.0,
            account_id: recharge.account_id.0,
            username,
            amount: recharge.amount,
            trn: recharge.trn.clone(),
            status: recharge.status,
            created_at: timestamp(recharge.created_at_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargesResponse {
    pub recharges: Vec<RechargeView>,
}

/// One payout parked after a settlement failure, for operator review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationView {
    pub round_id: u64,
    pub bet_id: u64,
    pub account_id: u64,
    pub owed: u64,
    pub reason: String,
}

/// GET /reconciliation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResponse {
    pub entries: Vec<ReconciliationView>,
}
