//! Multi-opponent controller
//!
//! Plays the current game with the single-opponent rules and picks who to
//! face next from freshly built reputations.

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reputation::{build_profiles, Histories, OpponentId};
use crate::selection::SelectionPolicy;
use crate::strategy::{evaluate, Move, Rule};

/// Outcome of one controller call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Move to play against the current opponent
    #[serde(rename = "move")]
    pub chosen: Move,
    pub rule: Rule,
    pub next_opponent: OpponentId,
}

/// Strategy engine for tournaments with opponent choice
#[derive(Clone, Debug, Default)]
pub struct Controller {
    config: EngineConfig,
}

impl Controller {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide the move against `current_id` and the opponent to face next.
    ///
    /// The round cap stands in for the unknown game length.
    pub fn turn(
        &self,
        current_id: OpponentId,
        my_histories: &Histories,
        opponent_histories: &Histories,
    ) -> Turn {
        let mine = my_histories.get(&current_id).map(Vec::as_slice).unwrap_or(&[]);
        let theirs = opponent_histories
            .get(&current_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let forgiver = self.config.forgiveness.forgiver(self.config.seed, current_id);
        let (chosen, rule) = evaluate(mine, theirs, Some(self.config.round_cap), &forgiver);

        let profiles = build_profiles(my_histories, opponent_histories);
        let next_opponent =
            SelectionPolicy::from(&self.config).select(current_id, &profiles, my_histories);

        event!(
            Level::DEBUG,
            current_id,
            round = mine.len(),
            ?chosen,
            ?rule,
            next_opponent,
            "turn"
        );

        Turn {
            chosen,
            rule,
            next_opponent,
        }
    }

    /// Returns `(move, next_opponent)`.
    pub fn play(
        &self,
        current_id: OpponentId,
        my_histories: &Histories,
        opponent_histories: &Histories,
    ) -> (Move, OpponentId) {
        let turn = self.turn(current_id, my_histories, opponent_histories);
        (turn.chosen, turn.next_opponent)
    }

    /// [`Controller::play`], rejecting unsynchronised histories.
    pub fn try_play(
        &self,
        current_id: OpponentId,
        my_histories: &Histories,
        opponent_histories: &Histories,
    ) -> Result<(Move, OpponentId), EngineError> {
        for (id, theirs) in opponent_histories {
            let mine = my_histories.get(id).map_or(0, Vec::len);
            // a missing own entry is only valid before the first round
            if mine != theirs.len() {
                return Err(EngineError::OpponentHistoryMismatch {
                    opponent: *id,
                    mine,
                    theirs: theirs.len(),
                });
            }
        }
        Ok(self.play(current_id, my_histories, opponent_histories))
    }
}
