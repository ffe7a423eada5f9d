use serde::{Deserialize, Serialize};
use std::fmt;

/// Betting colors. The draw is weighted: see `game::rng`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Green,
    Red,
    Violet,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Green => write!(f, "GREEN"),
            Color::Red => write!(f, "RED"),
            Color::Violet => write!(f, "VIOLET"),
        }
    }
}

/// Payout multipliers applied during settlement.
pub const NUMBER_MATCH_MULTIPLIER: u32 = 4;
pub const COLOR_MATCH_MULTIPLIER: u32 = 2;
pub const VIOLET_MATCH_MULTIPLIER: u32 = 7;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Account identifier, assigned by the account directory.
    AccountId
);
id_newtype!(
    /// Round identifier: epoch milliseconds with a monotonic collision bump,
    /// so two rapid round creations never share an id.
    RoundId
);
id_newtype!(
    /// Bet identifier, assigned by the bet store.
    BetId
);
id_newtype!(
    /// Recharge identifier, assigned by the recharge book.
    RechargeId
);

/// Settlement state of a round. Exactly one round is OPEN or SETTLING at a
/// time, process-wide.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Open,
    Settling,
    Settled,
}

/// One timed betting cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub started_at_ms: u64,
    pub duration_secs: u64,
    pub phase: RoundPhase,
}

impl Round {
    /// Seconds left in the betting window; negative once expired.
    pub fn remaining_seconds(&self, now_ms: u64) -> i64 {
        let elapsed = (now_ms.saturating_sub(self.started_at_ms) / 1_000) as i64;
        self.duration_secs as i64 - elapsed
    }

    /// The betting window is open only while the phase is OPEN and time
    /// remains, independent of whether settlement has started.
    pub fn accepts_bets(&self, now_ms: u64) -> bool {
        self.phase == RoundPhase::Open && self.remaining_seconds(now_ms) > 0
    }
}

/// One account's stake plus predicted color (and optionally number) for a
/// round. Outcome fields stay unset until the round settles, then are
/// write-once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bet {
    pub id: BetId,
    pub round_id: RoundId,
    pub account_id: AccountId,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_winner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
    pub placed_at_ms: u64,
}

impl Bet {
    /// Amount credited at settlement: stake times multiplier, zero until the
    /// bet has been evaluated or when it lost.
    pub fn payout(&self) -> u64 {
        match (self.is_winner, self.multiplier) {
            (Some(true), Some(m)) => self.amount * u64::from(m),
            _ => 0,
        }
    }
}

/// The winning color and number for a round, drawn once and immutable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub winning_color: Color,
    pub winning_number: u8,
}

/// Cached summary of a settled round: the outcome plus the final bet list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_id: RoundId,
    pub winning_color: Color,
    pub winning_number: u8,
    pub bets: Vec<Bet>,
    pub settled_at_ms: u64,
}

/// Identity record. Credentials live in the external auth flow, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
}

/// Recharge approval state. PENDING -> APPROVED is the idempotency gate for
/// the ledger credit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RechargeStatus {
    Pending,
    Approved,
}

/// A pending balance-credit request with its external transaction reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recharge {
    pub id: RechargeId,
    pub account_id: AccountId,
    pub amount: u64,
    /// External payment transaction reference supplied by the player.
    pub trn: String,
    pub status: RechargeStatus,
    pub created_at_ms: u64,
}
