//! Strategy Engine for the Iterated Prisoner's Dilemma
//!
//! Pure decision rules for a single game, plus a controller that profiles
//! every known opponent and chooses who to play next. All history is
//! supplied by the caller on each call. This crate is compiled to:
//! - Native (for tournament harnesses)
//! - WASM (for in-browser play and replay)

mod config;
mod controller;
mod detect;
mod error;
mod forgiveness;
mod game;
mod opponents;
mod random;
mod reputation;
mod selection;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{EngineConfig, DEFAULT_COLD_START_OPPONENTS, DEFAULT_ROUND_CAP};
pub use controller::{Controller, Turn};
pub use error::{ConfigError, EngineError};
pub use forgiveness::{
    Forgiveness, Forgiver, ForgivenessPolicy, PeriodicForgiveness, RandomForgiveness,
};
pub use game::{run_match, MatchResult, RoundResult};
pub use opponents::ReferenceOpponent;
pub use random::SeededRng;
pub use reputation::{build_profiles, Histories, OpponentId, OpponentProfile, Pattern};
pub use selection::{select_next, selection_score, SelectionPolicy};
pub use strategy::{decide, evaluate, try_decide, Move, Rule};

/// Standalone pattern detectors used by the decision rules.
pub mod detectors {
    pub use crate::detect::{
        cooperation_rate, find_cycle, in_mutual_defection, is_exploiting, is_random,
        is_tit_for_tat, mirrors_previous, recent_trend, stability, RecentTrend,
    };
}

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u8, u8) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}
