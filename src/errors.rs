//! Error types for the colorbet service
//!
//! One taxonomy for everything the game core can reject, so the API layer
//! can map each variant to a distinct error code.

use crate::game::types::{BetId, RechargeId, RoundId};

/// Root error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Bet rejected before any mutation: bad stake, bad number, bad color.
    #[error("invalid bet: {0}")]
    InvalidBet(String),

    /// Generic request validation failure outside the betting path.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Stake exceeds the account balance. Rejected before the debit.
    #[error("insufficient balance")]
    InsufficientFunds,

    /// The account already has a bet in the current round.
    #[error("a bet was already placed this round")]
    DuplicateBet,

    /// The round countdown has expired; no further bets until the next round.
    #[error("betting is closed for this round")]
    WindowClosed,

    #[error("account not found: {0}")]
    UnknownAccount(String),

    #[error("username already taken: {0}")]
    AccountExists(String),

    #[error("recharge not found: {0}")]
    UnknownRecharge(RechargeId),

    /// A recharge may credit the ledger at most once.
    #[error("recharge {0} was already approved")]
    RechargeAlreadyApproved(RechargeId),

    #[error("bet {bet} not found in round {round}")]
    UnknownBet { round: RoundId, bet: BetId },

    /// Outcome fields are write-once; a second write means settlement ran
    /// twice for the same bet and must be surfaced, never swallowed.
    #[error("outcome already recorded for bet {0}")]
    OutcomeAlreadyRecorded(BetId),
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::BetId;

    #[test]
    fn test_error_display_is_user_facing() {
        assert_eq!(
            GameError::WindowClosed.to_string(),
            "betting is closed for this round"
        );
        assert_eq!(
            GameError::DuplicateBet.to_string(),
            "a bet was already placed this round"
        );
    }

    #[test]
    fn test_unknown_account_carries_identifier() {
        let err = GameError::UnknownAccount("alice".to_string());
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_write_once_violation_names_the_bet() {
        let err = GameError::OutcomeAlreadyRecorded(BetId(7));
        assert!(err.to_string().contains('7'));
    }
}
