//! Reference opponents for evaluating the engine

use serde::{Deserialize, Serialize};

use crate::random::SeededRng;
use crate::strategy::Move;

/// Fixed, well-known IPD behaviours
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceOpponent {
    AlwaysCooperate,
    AlwaysDefect,
    /// Copy the other side's last move. Start with cooperate.
    TitForTat,
    /// Cooperate with `cooperate_bias` percent chance each round.
    Random { cooperate_bias: u8 },
    /// Repeat a fixed block of moves.
    Cycle(Vec<Move>),
}

impl ReferenceOpponent {
    /// Next move for this opponent
    ///
    /// # Arguments
    /// * `other_history` - Moves played against this opponent so far
    /// * `round` - Current round number (0-indexed)
    /// * `rng` - Random number generator for this round
    pub fn next_move(&self, other_history: &[Move], round: usize, rng: &mut SeededRng) -> Move {
        match self {
            ReferenceOpponent::AlwaysCooperate => Move::Cooperate,
            ReferenceOpponent::AlwaysDefect => Move::Defect,
            ReferenceOpponent::TitForTat => other_history.last().copied().unwrap_or(Move::Cooperate),
            ReferenceOpponent::Random { cooperate_bias } => {
                if rng.next_percent() < *cooperate_bias {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
            ReferenceOpponent::Cycle(block) => {
                block.get(round % block.len().max(1)).copied().unwrap_or(Move::Cooperate)
            }
        }
    }
}
