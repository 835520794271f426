//! Opponent reputation model
//!
//! Profiles are rebuilt from scratch on every call from the histories the
//! caller supplies; nothing is cached between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::detect;
use crate::payoff;
use crate::strategy::Move;

/// Opponent identifier assigned by the external harness.
pub type OpponentId = u32;

/// Per-opponent move histories, iterated in ascending id order.
pub type Histories = BTreeMap<OpponentId, Vec<Move>>;

/// Behavioural class of an opponent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    AlwaysCooperate,
    AlwaysDefect,
    TitForTat,
    MostlyCooperate,
    MostlyDefect,
    Mixed,
    /// No rounds observed yet
    Unknown,
}

impl Pattern {
    /// How readily sustained defection pays off against this class.
    pub fn exploitability(self) -> f64 {
        match self {
            Pattern::AlwaysCooperate => 1.0,
            Pattern::AlwaysDefect => 0.0,
            Pattern::TitForTat => 0.3,
            Pattern::MostlyCooperate => 0.8,
            Pattern::MostlyDefect => 0.1,
            Pattern::Mixed | Pattern::Unknown => 0.5,
        }
    }
}

/// Summary of how an opponent has behaved against us
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpponentProfile {
    pub cooperation_rate: f64,
    pub pattern: Pattern,
    pub exploitability: f64,
    pub stability: f64,
    /// Predicted points per round under a counter-policy
    pub score_potential: f64,
    /// Points per round actually earned so far
    pub average_score: f64,
    pub rounds_played: usize,
}

impl Default for OpponentProfile {
    /// Optimistic prior for an opponent we have not played.
    fn default() -> Self {
        Self {
            cooperation_rate: 1.0,
            pattern: Pattern::Unknown,
            exploitability: 0.5,
            stability: 0.5,
            score_potential: 3.0,
            average_score: 0.0,
            rounds_played: 0,
        }
    }
}

impl OpponentProfile {
    /// Profile one opponent from the paired histories of our game with them.
    pub fn from_histories(my_history: &[Move], opponent_history: &[Move]) -> Self {
        if opponent_history.is_empty() {
            return Self::default();
        }

        let cooperation_rate = detect::cooperation_rate(opponent_history);
        let average_score = average_score(my_history, opponent_history);
        let pattern = classify(my_history, opponent_history, cooperation_rate);
        let exploitability = pattern.exploitability();

        let score_potential = match pattern {
            Pattern::AlwaysCooperate => 5.0,
            Pattern::AlwaysDefect => 1.0,
            Pattern::TitForTat => 3.0,
            _ => (average_score * (1.0 + exploitability * 0.5)).min(5.0),
        };

        Self {
            cooperation_rate,
            pattern,
            exploitability,
            stability: detect::stability(opponent_history),
            score_potential,
            average_score,
            rounds_played: my_history.len(),
        }
    }
}

/// Points per round we earned; `0.0` before our first move.
pub fn average_score(my_history: &[Move], opponent_history: &[Move]) -> f64 {
    if my_history.is_empty() {
        return 0.0;
    }
    let total: u32 = my_history
        .iter()
        .zip(opponent_history)
        .map(|(mine, theirs)| payoff(*mine, *theirs).0 as u32)
        .sum();
    total as f64 / my_history.len() as f64
}

/// Classify a non-empty opponent history.
pub fn classify(my_history: &[Move], opponent_history: &[Move], cooperation_rate: f64) -> Pattern {
    let all = |m: Move| opponent_history.iter().all(|x| *x == m);

    if all(Move::Cooperate) {
        Pattern::AlwaysCooperate
    } else if all(Move::Defect) {
        Pattern::AlwaysDefect
    } else if my_history.len() > 1 && detect::mirrors_previous(my_history, opponent_history) {
        Pattern::TitForTat
    } else if cooperation_rate > 0.8 {
        Pattern::MostlyCooperate
    } else if cooperation_rate < 0.2 {
        Pattern::MostlyDefect
    } else {
        Pattern::Mixed
    }
}

/// Build a profile for every opponent present in `opponent_histories`.
pub fn build_profiles(
    my_histories: &Histories,
    opponent_histories: &Histories,
) -> BTreeMap<OpponentId, OpponentProfile> {
    opponent_histories
        .iter()
        .map(|(id, theirs)| {
            let mine = my_histories.get(id).map(Vec::as_slice).unwrap_or(&[]);
            let profile = OpponentProfile::from_histories(mine, theirs);
            event!(
                Level::DEBUG,
                opponent = id,
                pattern = ?profile.pattern,
                score_potential = profile.score_potential,
                rounds = profile.rounds_played,
                "profiled opponent"
            );
            (*id, profile)
        })
        .collect()
}
