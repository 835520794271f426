//! Next-opponent selection
//!
//! Explores broadly until enough opponents have been tried, then greedily
//! picks the opponent with the best expected return. Ties always go to the
//! first candidate in id order.

use std::collections::BTreeMap;

use tracing::{event, Level};

use crate::config::{EngineConfig, DEFAULT_COLD_START_OPPONENTS, DEFAULT_ROUND_CAP};
use crate::reputation::{Histories, OpponentId, OpponentProfile, Pattern};

/// Bonus for staying with a favourable current opponent.
const STICKINESS_BONUS: f64 = 0.2;

/// Score potential above which the current opponent earns stickiness.
const STICKINESS_THRESHOLD: f64 = 2.5;

/// Selection parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub round_cap: usize,
    pub cold_start_opponents: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            round_cap: DEFAULT_ROUND_CAP,
            cold_start_opponents: DEFAULT_COLD_START_OPPONENTS,
        }
    }
}

impl From<&EngineConfig> for SelectionPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            round_cap: config.round_cap,
            cold_start_opponents: config.cold_start_opponents,
        }
    }
}

impl SelectionPolicy {
    /// Choose the opponent to face next.
    ///
    /// Falls back to `current_id` when every opponent has reached the cap.
    pub fn select(
        &self,
        current_id: OpponentId,
        profiles: &BTreeMap<OpponentId, OpponentProfile>,
        my_histories: &Histories,
    ) -> OpponentId {
        let eligible: Vec<(OpponentId, &OpponentProfile)> = profiles
            .iter()
            .filter(|(id, _)| {
                my_histories
                    .get(*id)
                    .is_some_and(|h| h.len() < self.round_cap)
            })
            .map(|(id, p)| (*id, p))
            .collect();

        if eligible.is_empty() {
            event!(Level::DEBUG, current_id, "no eligible opponents, staying");
            return current_id;
        }

        let explored = profiles.values().filter(|p| p.rounds_played > 0).count();
        if explored < self.cold_start_opponents {
            // min_by_key keeps the first of equal minima
            if let Some((id, p)) = eligible.iter().min_by_key(|(_, p)| p.rounds_played) {
                event!(Level::DEBUG, opponent = *id, rounds = p.rounds_played, "exploring");
                return *id;
            }
        }

        let mut best: Option<(OpponentId, f64)> = None;
        for (id, profile) in &eligible {
            let score = selection_score(*id == current_id, profile);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((*id, score));
            }
        }

        let (id, score) = best.unwrap_or((current_id, 0.0));
        event!(Level::DEBUG, opponent = id, score, "selected opponent");
        id
    }
}

/// Desirability of facing an opponent next.
pub fn selection_score(is_current: bool, profile: &OpponentProfile) -> f64 {
    let rounds = profile.rounds_played as f64;

    let exploration = (1.0 - rounds / 20.0).max(0.0);
    let stability = profile.stability * 0.5;
    let pattern = match profile.pattern {
        // valuable, but don't burn through it early
        Pattern::AlwaysCooperate => 2.0 - rounds / 100.0,
        Pattern::TitForTat => 1.0 + rounds / 200.0,
        Pattern::AlwaysDefect => -1.0,
        _ => 0.0,
    };

    let mut score = profile.score_potential + exploration + stability + pattern;
    if is_current && profile.score_potential > STICKINESS_THRESHOLD {
        score += STICKINESS_BONUS;
    }
    score
}

/// Choose the next opponent with the default round cap and cold-start size.
pub fn select_next(
    current_id: OpponentId,
    profiles: &BTreeMap<OpponentId, OpponentProfile>,
    my_histories: &Histories,
) -> OpponentId {
    SelectionPolicy::default().select(current_id, profiles, my_histories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::build_profiles;
    use crate::strategy::Move;

    fn profile(pattern: Pattern, score_potential: f64, stability: f64, rounds_played: usize) -> OpponentProfile {
        OpponentProfile {
            cooperation_rate: 0.5,
            pattern,
            exploitability: pattern.exploitability(),
            stability,
            score_potential,
            average_score: 0.0,
            rounds_played,
        }
    }

    fn played(ids: &[(OpponentId, usize)]) -> Histories {
        ids.iter()
            .map(|(id, n)| (*id, vec![Move::Cooperate; *n]))
            .collect()
    }

    #[test]
    fn test_cold_start_picks_least_played() {
        let my = played(&[(1, 4), (2, 0), (3, 2), (4, 0)]);
        let profiles = build_profiles(&my, &my);
        assert_eq!(select_next(1, &profiles, &my), 2);
    }

    #[test]
    fn test_cold_start_tie_breaks_by_id_order() {
        let my = played(&[(7, 3), (8, 3), (9, 3)]);
        let profiles = build_profiles(&my, &my);
        assert_eq!(select_next(9, &profiles, &my), 7);
    }

    #[test]
    fn test_no_eligible_returns_current() {
        let my = played(&[(1, 200), (2, 200)]);
        let profiles = build_profiles(&my, &my);
        assert_eq!(select_next(2, &profiles, &my), 2);

        let empty = BTreeMap::new();
        assert_eq!(select_next(42, &empty, &Histories::new()), 42);
    }

    #[test]
    fn test_opponents_without_my_history_are_ineligible() {
        let my = played(&[(1, 200)]);
        let mut profiles = build_profiles(&my, &my);
        profiles.insert(2, OpponentProfile::default());
        assert_eq!(select_next(1, &profiles, &my), 1);
    }

    #[test]
    fn test_greedy_prefers_best_score() {
        let mut profiles = BTreeMap::new();
        profiles.insert(1, profile(Pattern::AlwaysDefect, 1.0, 1.0, 30));
        profiles.insert(2, profile(Pattern::Mixed, 2.0, 0.2, 30));
        profiles.insert(3, profile(Pattern::AlwaysCooperate, 5.0, 1.0, 30));
        profiles.insert(4, profile(Pattern::TitForTat, 3.0, 1.0, 30));
        profiles.insert(5, profile(Pattern::MostlyDefect, 0.5, 0.8, 30));
        let my = played(&[(1, 30), (2, 30), (3, 30), (4, 30), (5, 30)]);
        assert_eq!(select_next(1, &profiles, &my), 3);
    }

    #[test]
    fn test_capped_opponent_skipped() {
        let mut profiles = BTreeMap::new();
        profiles.insert(1, profile(Pattern::Mixed, 1.0, 0.5, 30));
        profiles.insert(2, profile(Pattern::Mixed, 1.0, 0.5, 30));
        profiles.insert(3, profile(Pattern::AlwaysCooperate, 5.0, 1.0, 200));
        profiles.insert(4, profile(Pattern::Mixed, 1.5, 0.5, 30));
        profiles.insert(5, profile(Pattern::Mixed, 1.0, 0.5, 30));
        let my = played(&[(1, 30), (2, 30), (3, 200), (4, 30), (5, 30)]);
        assert_eq!(select_next(1, &profiles, &my), 4);
    }

    #[test]
    fn test_stickiness_breaks_near_tie() {
        let mut profiles = BTreeMap::new();
        for id in 1..=5 {
            profiles.insert(id, profile(Pattern::Mixed, 3.0, 0.5, 40));
        }
        let my = played(&[(1, 40), (2, 40), (3, 40), (4, 40), (5, 40)]);
        // all tie without stickiness: first id wins
        assert_eq!(select_next(99, &profiles, &my), 1);
        assert_eq!(select_next(4, &profiles, &my), 4);
    }

    #[test]
    fn test_selection_score_components() {
        let fresh = profile(Pattern::AlwaysCooperate, 5.0, 1.0, 0);
        // 5 + 1 + 0.5 + 2 + 0.2
        assert!((selection_score(true, &fresh) - 8.7).abs() < 1e-9);

        let tft = profile(Pattern::TitForTat, 3.0, 0.5, 100);
        // 3 + 0 + 0.25 + 1.5
        assert!((selection_score(false, &tft) - 4.75).abs() < 1e-9);

        let low = profile(Pattern::Mixed, 2.0, 0.0, 10);
        // 2 + 0.5, no stickiness below 2.5
        assert!((selection_score(true, &low) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_policy_from_config() {
        let config = EngineConfig {
            round_cap: 3,
            cold_start_opponents: 0,
            ..EngineConfig::default()
        };
        let policy = SelectionPolicy::from(&config);
        let my = played(&[(1, 3), (2, 2)]);
        let profiles = build_profiles(&my, &my);
        assert_eq!(policy.select(1, &profiles, &my), 2);
    }
}
