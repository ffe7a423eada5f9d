//! API Error Handling
//!
//! Structured error responses with request tracking. Every game error maps
//! to a distinct error code so callers can tell a closed window from a
//! duplicate bet from an empty balance.

use crate::errors::GameError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level API error response with request tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: ErrorBody,
}

/// Error body with structured information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code (WINDOW_CLOSED, DUPLICATE_BET, ...).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error carrying its HTTP mapping and the originating request id.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub request_id: String,
}

impl ApiError {
    pub fn bad_request(request_id: String, message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST",
            message,
            request_id,
        }
    }

    pub fn not_found(request_id: String, message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message,
            request_id,
        }
    }

    pub fn internal_error(request_id: String, message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message,
            request_id,
        }
    }

    /// Map a game-core rejection to its wire representation.
    pub fn from_game(request_id: String, err: GameError) -> Self {
        let (status, code) = match &err {
            GameError::InvalidBet(_) => (StatusCode::BAD_REQUEST, "INVALID_BET"),
            GameError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            GameError::InsufficientFunds => (StatusCode::FORBIDDEN, "INSUFFICIENT_FUNDS"),
            GameError::DuplicateBet => (StatusCode::BAD_REQUEST, "DUPLICATE_BET"),
            GameError::WindowClosed => (StatusCode::FORBIDDEN, "WINDOW_CLOSED"),
            GameError::UnknownAccount(_) => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
            GameError::AccountExists(_) => (StatusCode::BAD_REQUEST, "ACCOUNT_EXISTS"),
            GameError::UnknownRecharge(_) => (StatusCode::NOT_FOUND, "RECHARGE_NOT_FOUND"),
            GameError::RechargeAlreadyApproved(_) => {
                (StatusCode::BAD_REQUEST, "RECHARGE_ALREADY_APPROVED")
            }
            // Settlement bookkeeping failures are never a caller's fault.
            GameError::UnknownBet { .. } | GameError::OutcomeAlreadyRecorded(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        Self {
            status,
            code,
            message: err.to_string(),
            request_id,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.request_id, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            request_id: self.request_id,
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
            },
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rejection_reason_has_a_distinct_code() {
        let cases = [
            (GameError::WindowClosed, "WINDOW_CLOSED"),
            (GameError::DuplicateBet, "DUPLICATE_BET"),
            (GameError::InsufficientFunds, "INSUFFICIENT_FUNDS"),
            (
                GameError::UnknownAccount("x".to_string()),
                "ACCOUNT_NOT_FOUND",
            ),
            (GameError::InvalidBet("x".to_string()), "INVALID_BET"),
        ];
        for (err, code) in cases {
            let api = ApiError::from_game("req-1".to_string(), err);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn test_window_closed_is_forbidden() {
        let api = ApiError::from_game("req-1".to_string(), GameError::WindowClosed);
        assert_eq!(api.status, StatusCode::FORBIDDEN);
    }
}
