//! Request Handlers
//!
//! Thin HTTP adapters over the game session facade. Handlers resolve
//! usernames to accounts, delegate, and translate rejections into
//! request-tracked error responses.

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::game::{GameSession, RechargeId, RechargeStatus};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub session: Arc<GameSession>,
    pub version: String,
}

impl AppState {
    fn round_summary_view(
        &self,
        summary: &crate::game::RoundSummary,
    ) -> RoundSummaryView {
        RoundSummaryView::from_summary(summary, |bet| self.session.username(bet.account_id))
    }
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
    })
}

/// GET /game
///
/// Round state plus last-round summary. This read drives the lazy expiry
/// check: an expired round settles here before the response is built.
pub async fn game_state_handler(
    State(state): State<Arc<AppState>>,
) -> Json<GameStateResponse> {
    let game_state = state.session.state();

    let bets = game_state
        .round
        .bets
        .iter()
        .map(|bet| BetView::from_bet(bet, state.session.username(bet.account_id)))
        .collect();

    Json(GameStateResponse {
        round: ActiveRoundView {
            id: game_state.round.id.0,
            remaining_seconds: game_state.round.remaining_seconds,
            duration_seconds: game_state.round.duration_seconds,
            bets,
        },
        last_round: game_state
            .last_round
            .as_ref()
            .map(|summary| state.round_summary_view(summary)),
    })
}

/// POST /game/bet
pub async fn place_bet_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlaceBetRequest>,
) -> Result<Json<BetView>, ApiError> {
    let account_id = state
        .session
        .resolve_account(&request.username)
        .map_err(|e| ApiError::from_game(request_id.0.clone(), e))?;

    let bet = state
        .session
        .place_bet(account_id, request.color, request.amount, request.number)
        .map_err(|e| ApiError::from_game(request_id.0.clone(), e))?;

    Ok(Json(BetView::from_bet(&bet, Some(request.username))))
}

/// POST /accounts
pub async fn register_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .session
        .register(&request.username)
        .map_err(|e| ApiError::from_game(request_id.0, e))?;

    Ok(Json(AccountResponse {
        id: account.id.0,
        username: account.username,
    }))
}

/// GET /accounts/:username/balance
pub async fn balance_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let account_id = state
        .session
        .resolve_account(&username)
        .map_err(|e| ApiError::from_game(request_id.0.clone(), e))?;
    let balance = state
        .session
        .balance(account_id)
        .map_err(|e| ApiError::from_game(request_id.0, e))?;

    Ok(Json(BalanceResponse { username, balance }))
}

/// GET /accounts/:username/bets
pub async fn bet_history_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<BetHistoryResponse>, ApiError> {
    let account_id = state
        .session
        .resolve_account(&username)
        .map_err(|e| ApiError::from_game(request_id.0, e))?;

    let bets = state
        .session
        .bet_history(account_id)
        .iter()
        .map(|bet| BetView::from_bet(bet, Some(username.clone())))
        .collect();

    Ok(Json(BetHistoryResponse { username, bets }))
}

/// GET /rounds
pub async fn rounds_handler(State(state): State<Arc<AppState>>) -> Json<RoundsResponse> {
    let rounds = state
        .session
        .settled_rounds()
        .iter()
        .map(|summary| state.round_summary_view(summary))
        .collect();
    Json(RoundsResponse { rounds })
}

/// POST /recharges
pub async fn recharge_request_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RechargeRequest>,
) -> Result<Json<RechargeView>, ApiError> {
    let account_id = state
        .session
        .resolve_account(&request.username)
        .map_err(|e| ApiError::from_game(request_id.0.clone(), e))?;

    let recharge = state
        .session
        .request_recharge(account_id, request.amount, &request.trn)
        .map_err(|e| ApiError::from_game(request_id.0, e))?;

    Ok(Json(RechargeView::from_recharge(
        &recharge,
        Some(request.username),
    )))
}

/// Recharge list query parameters.
#[derive(Debug, Deserialize)]
pub struct RechargesQuery {
    #[serde(default)]
    pub status: Option<RechargeStatus>,
    #[serde(default)]
    pub username: Option<String>,
}

/// GET /recharges?status={pending|approved}&username={name}
pub async fn recharges_list_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Query(params): Query<RechargesQuery>,
) -> Result<Json<RechargesResponse>, ApiError> {
    let recharges = match params.username {
        Some(username) => {
            let account_id = state
                .session
                .resolve_account(&username)
                .map_err(|e| ApiError::from_game(request_id.0, e))?;
            state.session.recharges_for_account(account_id)
        }
        None => state.session.recharges(params.status),
    };

    let recharges = recharges
        .iter()
        .map(|recharge| {
            RechargeView::from_recharge(recharge, state.session.username(recharge.account_id))
        })
        .collect();

    Ok(Json(RechargesResponse { recharges }))
}

/// GET /reconciliation
///
/// Payouts that settlement could not apply, awaiting manual review.
pub async fn reconciliation_handler(
    State(state): State<Arc<AppState>>,
) -> Json<ReconciliationResponse> {
    let entries = state
        .session
        .pending_reconciliation()
        .iter()
        .map(|entry| ReconciliationView {
            round_id: entry.round_id.0,
            bet_id: entry.bet_id.0,
            account_id: entry.account_id.0,
            owed: entry.owed,
            reason: entry.reason.clone(),
        })
        .collect();
    Json(ReconciliationResponse { entries })
}

/// POST /recharges/:id/approve
pub async fn recharge_approve_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<RechargeView>, ApiError> {
    let recharge = state
        .session
        .approve_recharge(RechargeId(id))
        .map_err(|e| ApiError::from_game(request_id.0, e))?;

    let username = state.session.username(recharge.account_id);
    Ok(Json(RechargeView::from_recharge(&recharge, username)))
}
