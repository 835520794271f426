//! Single-game simulation against a reference opponent

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::opponents::ReferenceOpponent;
use crate::payoff;
use crate::random::SeededRng;
use crate::strategy::{evaluate, Move, Rule};

/// Stream id used for the engine's forgiveness draws.
const ENGINE_STREAM: u32 = 0;

/// Stream id used for the opponent's draws.
const OPPONENT_STREAM: u32 = 1;

/// Result of a single round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: usize,
    pub engine_move: Move,
    pub opponent_move: Move,
    /// Rule that produced the engine's move
    pub rule: Rule,
    pub engine_score: u8,
    pub opponent_score: u8,
    pub cumulative_engine: u32,
    pub cumulative_opponent: u32,
}

/// Result of a complete match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    pub rounds: Vec<RoundResult>,
    pub total_engine: u32,
    pub total_opponent: u32,
}

impl MatchResult {
    pub fn engine_history(&self) -> Vec<Move> {
        self.rounds.iter().map(|r| r.engine_move).collect()
    }

    pub fn opponent_history(&self) -> Vec<Move> {
        self.rounds.iter().map(|r| r.opponent_move).collect()
    }
}

/// Play `round_count` rounds of the engine against a reference opponent.
///
/// # Arguments
/// * `config` - Engine configuration; its seed drives both sides' draws
/// * `opponent` - The opponent to face
/// * `round_count` - Length of the game
/// * `announce_length` - Whether the engine is told the game length
pub fn run_match(
    config: &EngineConfig,
    opponent: &ReferenceOpponent,
    round_count: usize,
    announce_length: bool,
) -> MatchResult {
    let forgiver = config.forgiveness.forgiver(config.seed, ENGINE_STREAM);
    let opponent_rng = SeededRng::new(config.seed, OPPONENT_STREAM);
    let round_limit = announce_length.then_some(round_count);

    let mut engine_history: Vec<Move> = Vec::with_capacity(round_count);
    let mut opponent_history: Vec<Move> = Vec::with_capacity(round_count);
    let mut rounds: Vec<RoundResult> = Vec::with_capacity(round_count);
    let mut total_engine = 0u32;
    let mut total_opponent = 0u32;

    for round in 0..round_count {
        // Both sides see only the completed rounds
        let (engine_move, rule) = evaluate(&engine_history, &opponent_history, round_limit, &forgiver);
        let opponent_move = opponent.next_move(&engine_history, round, &mut opponent_rng.for_round(round));

        let (engine_score, opponent_score) = payoff(engine_move, opponent_move);
        total_engine += engine_score as u32;
        total_opponent += opponent_score as u32;

        rounds.push(RoundResult {
            round,
            engine_move,
            opponent_move,
            rule,
            engine_score,
            opponent_score,
            cumulative_engine: total_engine,
            cumulative_opponent: total_opponent,
        });

        engine_history.push(engine_move);
        opponent_history.push(opponent_move);
    }

    MatchResult {
        rounds,
        total_engine,
        total_opponent,
    }
}
