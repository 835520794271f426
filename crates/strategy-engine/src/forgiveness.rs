//! Forgiveness policies for the tit-for-tat fallback
//!
//! When the fallback would mirror a defection, the policy decides whether to
//! cooperate anyway. Policies are pure in the round index so replaying the
//! same history reproduces the same decision.

use serde::{Deserialize, Serialize};

use crate::random::SeededRng;

/// Decides whether to forgive an opponent's defection in a given round.
pub trait Forgiveness {
    /// `round` is the index of the round about to be played.
    fn forgive(&self, round: usize) -> bool;
}

impl<F> Forgiveness for F
where
    F: Fn(usize) -> bool,
{
    fn forgive(&self, round: usize) -> bool {
        self(round)
    }
}

/// Forgive with a fixed percentage chance, drawn from a seeded stream.
#[derive(Clone, Debug)]
pub struct RandomForgiveness {
    rng: SeededRng,
    percent: u8,
}

impl RandomForgiveness {
    pub fn new(seed: u64, stream: u32, percent: u8) -> Self {
        Self {
            rng: SeededRng::new(seed, stream),
            percent,
        }
    }
}

impl Forgiveness for RandomForgiveness {
    fn forgive(&self, round: usize) -> bool {
        self.percent > 0 && self.rng.for_round(round).next_percent() < self.percent
    }
}

/// Forgive whenever the round index is a multiple of `period`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicForgiveness {
    period: usize,
}

impl PeriodicForgiveness {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Forgiveness for PeriodicForgiveness {
    fn forgive(&self, round: usize) -> bool {
        self.period > 0 && round % self.period == 0
    }
}

/// Configured forgiveness behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForgivenessPolicy {
    /// Percentage chance (0-100) to cooperate after a defection.
    Probabilistic { percent: u8 },
    /// Cooperate after a defection when `round % period == 0`.
    Periodic { period: usize },
}

impl Default for ForgivenessPolicy {
    fn default() -> Self {
        ForgivenessPolicy::Probabilistic { percent: 20 }
    }
}

impl ForgivenessPolicy {
    /// Instantiate the policy for one stream of play.
    pub fn forgiver(&self, seed: u64, stream: u32) -> Forgiver {
        match *self {
            ForgivenessPolicy::Probabilistic { percent } => {
                Forgiver::Random(RandomForgiveness::new(seed, stream, percent))
            }
            ForgivenessPolicy::Periodic { period } => {
                Forgiver::Periodic(PeriodicForgiveness::new(period))
            }
        }
    }
}

/// A concrete policy built from a [`ForgivenessPolicy`].
#[derive(Clone, Debug)]
pub enum Forgiver {
    Random(RandomForgiveness),
    Periodic(PeriodicForgiveness),
}

impl Forgiveness for Forgiver {
    fn forgive(&self, round: usize) -> bool {
        match self {
            Forgiver::Random(f) => f.forgive(round),
            Forgiver::Periodic(f) => f.forgive(round),
        }
    }
}
