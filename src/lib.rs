//! Colorbet - Timed Color-Prediction Betting Service
//!
//! Repeating betting rounds over a weighted color draw: players stake on a
//! color (optionally a number) before the countdown expires, then the round
//! settles exactly once and pays the winners.

pub mod api;
pub mod config;
pub mod errors;
pub mod game;

pub use config::ServiceConfig;
pub use errors::{GameError, GameResult};
pub use game::{GameSession, OutcomeGenerator};
