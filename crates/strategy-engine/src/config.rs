//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::forgiveness::ForgivenessPolicy;

/// Rounds playable against a single opponent in the multi-opponent setting.
pub const DEFAULT_ROUND_CAP: usize = 200;

/// Opponents that must have been tried before selection turns greedy.
pub const DEFAULT_COLD_START_OPPONENTS: usize = 5;

/// Tunables for the multi-opponent controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-opponent round cap, also used as the surrogate round limit
    pub round_cap: usize,
    /// Explored-opponent count below which the least-played opponent is chosen
    pub cold_start_opponents: usize,
    pub forgiveness: ForgivenessPolicy,
    /// Seed for probabilistic forgiveness
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap: DEFAULT_ROUND_CAP,
            cold_start_opponents: DEFAULT_COLD_START_OPPONENTS,
            forgiveness: ForgivenessPolicy::default(),
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::ZeroRoundCap);
        }
        match self.forgiveness {
            ForgivenessPolicy::Probabilistic { percent } if percent > 100 => {
                Err(ConfigError::PercentOutOfRange(percent))
            }
            ForgivenessPolicy::Periodic { period: 0 } => Err(ConfigError::ZeroPeriod),
            _ => Ok(()),
        }
    }
}
