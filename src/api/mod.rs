//! HTTP API Service
//!
//! The external surface of the betting service: round state queries, bet
//! placement, account history, and the recharge workflow.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
