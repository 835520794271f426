//! Single-opponent decision rules

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::detect::{self, RecentTrend, CYCLE_LEN};
use crate::error::EngineError;
use crate::forgiveness::Forgiveness;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// Decode the harness wire bit: `0` defects, anything else cooperates.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Move::Defect
        } else {
            Move::Cooperate
        }
    }

    /// Encode as the harness wire bit (`1` = cooperate, `0` = defect).
    pub fn to_bit(self) -> u8 {
        match self {
            Move::Cooperate => 1,
            Move::Defect => 0,
        }
    }
}

/// The rule that produced a decision, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    Opening,
    Endgame,
    TitForTat,
    RandomOpponent,
    Exploitation,
    Cycle,
    DeadlockRecovery,
    RecentCooperation,
    RecentHostility,
    Reciprocate,
    Forgive,
    Retaliate,
}

/// Pick the next move and report which rule decided it.
///
/// # Arguments
/// * `my_history` - Our past moves in this game
/// * `opponent_history` - Opponent's past moves, same length as ours
/// * `round_limit` - Total rounds in the game, if known
/// * `forgiveness` - Consulted only when the fallback would retaliate
pub fn evaluate<F>(
    my_history: &[Move],
    opponent_history: &[Move],
    round_limit: Option<usize>,
    forgiveness: &F,
) -> (Move, Rule)
where
    F: Forgiveness + ?Sized,
{
    let round = my_history.len();
    let (chosen, rule) = select_rule(my_history, opponent_history, round, round_limit, forgiveness);
    event!(Level::TRACE, round, ?rule, ?chosen, "decision");
    (chosen, rule)
}

fn select_rule<F>(
    my_history: &[Move],
    opponent_history: &[Move],
    round: usize,
    round_limit: Option<usize>,
    forgiveness: &F,
) -> (Move, Rule)
where
    F: Forgiveness + ?Sized,
{
    if my_history.is_empty() {
        return (Move::Cooperate, Rule::Opening);
    }

    if round_limit.is_some_and(|limit| round + 1 == limit) {
        return (Move::Defect, Rule::Endgame);
    }

    if detect::is_tit_for_tat(my_history, opponent_history) {
        return (Move::Cooperate, Rule::TitForTat);
    }

    if detect::is_random(opponent_history) {
        return (Move::Defect, Rule::RandomOpponent);
    }

    if detect::is_exploiting(my_history, opponent_history) {
        return (Move::Defect, Rule::Exploitation);
    }

    if let Some(pattern) = detect::find_cycle(opponent_history, CYCLE_LEN) {
        // Answer the predicted move in kind
        return (pattern[round % pattern.len()], Rule::Cycle);
    }

    if detect::in_mutual_defection(my_history, opponent_history) {
        return (Move::Cooperate, Rule::DeadlockRecovery);
    }

    match detect::recent_trend(opponent_history) {
        RecentTrend::Cooperative => return (Move::Cooperate, Rule::RecentCooperation),
        RecentTrend::Hostile => return (Move::Defect, Rule::RecentHostility),
        RecentTrend::Undecided => {}
    }

    match opponent_history.last() {
        Some(Move::Defect) if forgiveness.forgive(round) => (Move::Cooperate, Rule::Forgive),
        Some(Move::Defect) => (Move::Defect, Rule::Retaliate),
        _ => (Move::Cooperate, Rule::Reciprocate),
    }
}

/// Pick the next move against a single opponent.
pub fn decide<F>(
    my_history: &[Move],
    opponent_history: &[Move],
    round_limit: Option<usize>,
    forgiveness: &F,
) -> Move
where
    F: Forgiveness + ?Sized,
{
    evaluate(my_history, opponent_history, round_limit, forgiveness).0
}

/// [`decide`], rejecting histories of different lengths.
pub fn try_decide<F>(
    my_history: &[Move],
    opponent_history: &[Move],
    round_limit: Option<usize>,
    forgiveness: &F,
) -> Result<Move, EngineError>
where
    F: Forgiveness + ?Sized,
{
    if my_history.len() != opponent_history.len() {
        return Err(EngineError::HistoryLengthMismatch {
            mine: my_history.len(),
            theirs: opponent_history.len(),
        });
    }
    Ok(decide(my_history, opponent_history, round_limit, forgiveness))
}

/// Build a history from wire bits.
#[cfg(test)]
pub(crate) fn moves(bits: &[u8]) -> Vec<Move> {
    bits.iter().copied().map(Move::from_bit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forgiveness::PeriodicForgiveness;

    fn never(_: usize) -> bool {
        false
    }

    fn always(_: usize) -> bool {
        true
    }

    #[test]
    fn test_opening_move() {
        assert_eq!(evaluate(&[], &[], None, &never), (Move::Cooperate, Rule::Opening));
        assert_eq!(evaluate(&[], &[], Some(1), &never), (Move::Cooperate, Rule::Opening));
    }

    #[test]
    fn test_endgame_defects_on_last_round() {
        let my = vec![Move::Cooperate; 9];
        let opp = vec![Move::Cooperate; 9];
        assert_eq!(evaluate(&my, &opp, Some(10), &never), (Move::Defect, Rule::Endgame));
        // not the last round yet
        assert_eq!(decide(&my, &opp, Some(11), &never), Move::Cooperate);
        // unknown length
        assert_eq!(decide(&my, &opp, None, &never), Move::Cooperate);
    }

    #[test]
    fn test_endgame_beats_tit_for_tat() {
        let my = moves(&[1, 1, 1, 1]);
        let opp = moves(&[1, 1, 1, 1]);
        assert_eq!(evaluate(&my, &opp, None, &never).1, Rule::TitForTat);
        assert_eq!(evaluate(&my, &opp, Some(5), &never), (Move::Defect, Rule::Endgame));
    }

    #[test]
    fn test_tit_for_tat_sustains_cooperation() {
        let my = moves(&[1, 0, 1, 1]);
        let opp = moves(&[1, 1, 0, 1]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Cooperate, Rule::TitForTat));
    }

    #[test]
    fn test_random_opponent_defected_against() {
        let my = vec![Move::Defect; 20];
        let opp: Vec<Move> = (0..20)
            .map(|i| if i % 4 < 2 { Move::Cooperate } else { Move::Defect })
            .collect();
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Defect, Rule::RandomOpponent));
    }

    #[test]
    fn test_exploitation_stops_cooperation() {
        let my = moves(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        let opp = moves(&[0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Defect, Rule::Exploitation));
    }

    #[test]
    fn test_cycle_prediction() {
        let my = moves(&[1, 1, 1, 1, 1, 1]);
        let opp = moves(&[1, 0, 1, 1, 0, 1]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Cooperate, Rule::Cycle));
    }

    #[test]
    fn test_cycle_predicts_defection() {
        // block [0, 0, 1], round 7 -> pattern[1]
        let my = moves(&[0, 0, 0, 0, 0, 0, 0]);
        let opp = moves(&[0, 0, 1, 0, 0, 1, 0]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Defect, Rule::Cycle));
    }

    #[test]
    fn test_deadlock_recovery() {
        let my = moves(&[1, 0, 0]);
        let opp = moves(&[0, 0, 0]);
        assert_eq!(
            evaluate(&my, &opp, None, &never),
            (Move::Cooperate, Rule::DeadlockRecovery)
        );
    }

    #[test]
    fn test_recent_rates() {
        let my = moves(&[1, 1]);
        let opp = moves(&[0, 1]);
        // 1 of 2: undecided, mirrors cooperation
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Cooperate, Rule::Reciprocate));

        let my = moves(&[1, 0, 1, 0]);
        let opp = moves(&[0, 0, 0, 1]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Defect, Rule::RecentHostility));

        let my = moves(&[0, 1, 1, 1]);
        let opp = moves(&[1, 1, 1, 0]);
        // 3 of 4 recent cooperations outweighs the last defection
        assert_eq!(
            evaluate(&my, &opp, None, &never),
            (Move::Cooperate, Rule::RecentCooperation)
        );
    }

    #[test]
    fn test_fallback_forgiveness() {
        let my = moves(&[1, 0]);
        let opp = moves(&[1, 0]);
        assert_eq!(evaluate(&my, &opp, None, &never), (Move::Defect, Rule::Retaliate));
        assert_eq!(evaluate(&my, &opp, None, &always), (Move::Cooperate, Rule::Forgive));

        // round 2 is not a multiple of 5
        let periodic = PeriodicForgiveness::new(5);
        assert_eq!(decide(&my, &opp, None, &periodic), Move::Defect);
    }

    #[test]
    fn test_try_decide_rejects_mismatch() {
        let err = try_decide(&moves(&[1, 1]), &moves(&[1]), None, &never).unwrap_err();
        assert!(matches!(err, EngineError::HistoryLengthMismatch { mine: 2, theirs: 1 }));
        assert_eq!(try_decide(&[], &[], None, &never).unwrap(), Move::Cooperate);
    }

    #[test]
    fn test_wire_bits() {
        assert_eq!(Move::from_bit(1), Move::Cooperate);
        assert_eq!(Move::from_bit(0), Move::Defect);
        assert_eq!(Move::Cooperate.to_bit(), 1);
        assert_eq!(Move::Defect.to_bit(), 0);
    }
}
