//! Pattern detectors over move histories
//!
//! Every detector is a pure function of the histories it is handed, so each
//! heuristic can be exercised on its own. Ratios are compared with integer
//! cross-multiplication to keep thresholds exact.

use crate::strategy::Move;

/// Opponent history needed before tit-for-tat recognition kicks in.
pub const TIT_FOR_TAT_MIN_ROUNDS: usize = 3;

/// Opponent history needed before the randomness check is trusted.
pub const RANDOM_MIN_ROUNDS: usize = 20;

/// My history needed before exploitation detection runs.
pub const EXPLOITATION_MIN_ROUNDS: usize = 10;

/// Block length searched for by the cycle detector.
pub const CYCLE_LEN: usize = 3;

/// Window used for the recent cooperation rate.
pub const RECENT_WINDOW: usize = 10;

/// Count rounds `i >= 1` where the opponent's move `i` equals my move `i - 1`.
pub fn reciprocity_matches(my_history: &[Move], opponent_history: &[Move]) -> usize {
    opponent_history
        .iter()
        .skip(1)
        .zip(my_history.iter())
        .filter(|(theirs, mine)| theirs == mine)
        .count()
}

/// True if the opponent echoed my previous move in at least 90% of rounds.
///
/// No length or opening-move preconditions; see [`is_tit_for_tat`] for the
/// guarded form used by the decision rules.
pub fn mirrors_previous(my_history: &[Move], opponent_history: &[Move]) -> bool {
    let comparable = my_history.len().saturating_sub(1);
    reciprocity_matches(my_history, opponent_history) * 10 >= comparable * 9
}

/// Recognise a (possibly noisy) tit-for-tat opponent.
pub fn is_tit_for_tat(my_history: &[Move], opponent_history: &[Move]) -> bool {
    if opponent_history.len() < TIT_FOR_TAT_MIN_ROUNDS {
        return false;
    }
    if opponent_history.first() != Some(&Move::Cooperate) {
        return false;
    }
    mirrors_previous(my_history, opponent_history)
}

/// Number of COOPERATE moves in a history.
pub fn cooperations(history: &[Move]) -> usize {
    history.iter().filter(|m| **m == Move::Cooperate).count()
}

/// Fraction of COOPERATE moves, `0.0` for an empty history.
pub fn cooperation_rate(history: &[Move]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    cooperations(history) as f64 / history.len() as f64
}

/// True if the opponent looks like a coin flip: 20+ rounds, 40-60% cooperation.
pub fn is_random(opponent_history: &[Move]) -> bool {
    let n = opponent_history.len();
    if n < RANDOM_MIN_ROUNDS {
        return false;
    }
    let c = cooperations(opponent_history);
    // 0.4 <= c / n <= 0.6
    5 * c >= 2 * n && 5 * c <= 3 * n
}

/// True if the opponent defects after my cooperation more than 60% of the time.
pub fn is_exploiting(my_history: &[Move], opponent_history: &[Move]) -> bool {
    if my_history.len() < EXPLOITATION_MIN_ROUNDS {
        return false;
    }

    let mut cooperated = 0usize;
    let mut punished = 0usize;
    for (mine, their_next) in my_history.iter().zip(opponent_history.iter().skip(1)) {
        if *mine == Move::Cooperate {
            cooperated += 1;
            if *their_next == Move::Defect {
                punished += 1;
            }
        }
    }

    // punished / cooperated > 0.6
    cooperated > 0 && 5 * punished > 3 * cooperated
}

/// Find the first block of `len` moves immediately repeated by the next `len`.
pub fn find_cycle(history: &[Move], len: usize) -> Option<&[Move]> {
    if len == 0 || history.len() < len * 2 {
        return None;
    }
    (0..=history.len() - len * 2)
        .map(|i| (&history[i..i + len], &history[i + len..i + len * 2]))
        .find(|(block, next)| block == next)
        .map(|(block, _)| block)
}

/// Both players defected in each of the last two rounds.
pub fn in_mutual_defection(my_history: &[Move], opponent_history: &[Move]) -> bool {
    if my_history.len() < 2 || opponent_history.len() < 2 {
        return false;
    }
    let tail = |h: &[Move]| h[h.len() - 2..].iter().all(|m| *m == Move::Defect);
    tail(my_history) && tail(opponent_history)
}

/// Opponent leaning over the recent window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecentTrend {
    /// Cooperated in more than 70% of the window.
    Cooperative,
    /// Cooperated in fewer than 30% of the window.
    Hostile,
    Undecided,
}

/// Classify the last `min(10, len)` opponent moves.
pub fn recent_trend(opponent_history: &[Move]) -> RecentTrend {
    let window = RECENT_WINDOW.min(opponent_history.len());
    if window == 0 {
        return RecentTrend::Undecided;
    }
    let c = cooperations(&opponent_history[opponent_history.len() - window..]);
    if c * 10 > window * 7 {
        RecentTrend::Cooperative
    } else if c * 10 < window * 3 {
        RecentTrend::Hostile
    } else {
        RecentTrend::Undecided
    }
}

/// `1 - changes / (n - 1)`; `0.5` with fewer than three rounds.
pub fn stability(history: &[Move]) -> f64 {
    if history.len() < 3 {
        return 0.5;
    }
    let changes = history.windows(2).filter(|w| w[0] != w[1]).count();
    1.0 - changes as f64 / (history.len() - 1) as f64
}
