//! Error types for the checked entry points and configuration loading

use thiserror::Error;

use crate::reputation::OpponentId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("round cap must be at least 1")]
    ZeroRoundCap,
    #[error("forgiveness percent {0} exceeds 100")]
    PercentOutOfRange(u8),
    #[error("forgiveness period must be at least 1")]
    ZeroPeriod,
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("history lengths differ: mine has {mine} moves, opponent has {theirs}")]
    HistoryLengthMismatch { mine: usize, theirs: usize },
    #[error("histories for opponent {opponent} differ: mine has {mine} moves, theirs has {theirs}")]
    OpponentHistoryMismatch {
        opponent: OpponentId,
        mine: usize,
        theirs: usize,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
