//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check (high priority)
        .route("/health", get(health_handler))
        // Game state + timer; reads drive lazy settlement
        .route("/game", get(game_state_handler))
        .route("/game/bet", post(place_bet_handler))
        // Accounts
        .route("/accounts", post(register_handler))
        .route("/accounts/:username/balance", get(balance_handler))
        .route("/accounts/:username/bets", get(bet_history_handler))
        // Settled round history
        .route("/rounds", get(rounds_handler))
        // Recharge workflow
        .route(
            "/recharges",
            post(recharge_request_handler).get(recharges_list_handler),
        )
        .route("/recharges/:id/approve", post(recharge_approve_handler))
        // Operator view of payouts parked by settlement failures
        .route("/reconciliation", get(reconciliation_handler))
        // Attach shared state
        .with_state(state)
}
