//! Outcome generation
//!
//! Produces the weighted winning color and the independent winning number for
//! a round. Settlement calls `draw` exactly once per round and reuses the
//! result for every bet evaluation.

use crate::game::types::{Color, Outcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

enum Draws {
    Random(Mutex<StdRng>),
    /// Every draw returns the same outcome. Test and demo use only.
    Fixed(Outcome),
}

/// Weighted random outcome source for rounds.
pub struct OutcomeGenerator {
    draws: Draws,
}

impl OutcomeGenerator {
    /// Entropy-seeded generator for production.
    pub fn new() -> Self {
        Self {
            draws: Draws::Random(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Deterministic sequence from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            draws: Draws::Random(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Generator that always returns `outcome`. Lets tests pin the draw
    /// without reverse-engineering seed values.
    pub fn fixed(outcome: Outcome) -> Self {
        Self {
            draws: Draws::Fixed(outcome),
        }
    }

    /// GREEN with probability 0.49, RED with 0.49, VIOLET with 0.02, from a
    /// uniform draw over [0, 100).
    pub fn pick_color(&self) -> Color {
        match &self.draws {
            Draws::Fixed(outcome) => outcome.winning_color,
            Draws::Random(rng) => {
                let r: f64 = rng.lock().unwrap().gen_range(0.0..100.0);
                if r < 49.0 {
                    Color::Green
                } else if r < 98.0 {
                    Color::Red
                } else {
                    Color::Violet
                }
            }
        }
    }

    /// Uniform winning number in [0, 9].
    pub fn pick_number(&self) -> u8 {
        match &self.draws {
            Draws::Fixed(outcome) => outcome.winning_number,
            Draws::Random(rng) => rng.lock().unwrap().gen_range(0..10),
        }
    }

    /// The round's single outcome: one color pick, one number pick.
    pub fn draw(&self) -> Outcome {
        Outcome {
            winning_color: self.pick_color(),
            winning_number: self.pick_number(),
        }
    }
}

impl Default for OutcomeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
