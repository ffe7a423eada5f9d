pub mod accounts;
pub mod bets;
pub mod clock;
pub mod history;
pub mod ledger;
pub mod recharge;
pub mod rng;
pub mod session;
pub mod settlement;
pub mod time;
pub mod types;

pub use rng::OutcomeGenerator;
pub use session::{GameSession, GameState};
pub use types::*;
