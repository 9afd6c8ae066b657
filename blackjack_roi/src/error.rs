use crate::{OptionKind, Rank};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid rank index {0}, expected a value in [0, 13)")]
    InvalidRank(u8),

    #[error("invalid suit index {0}, expected a value in [0, 4)")]
    InvalidSuit(u8),

    #[error("invalid card index {0}, expected a value in [0, 52)")]
    InvalidCard(u8),

    #[error("shoe capacity {0} must be a positive multiple of 52")]
    InvalidCapacity(u16),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("the shoe cannot hold another {0}")]
    RankFull(Rank),

    #[error("no {0} remains in the shoe")]
    RankExhausted(Rank),

    #[error("shoe exhausted during {0}")]
    ShoeExhausted(&'static str),

    #[error("branch probabilities sum to {sum} instead of 1: {branches:?}")]
    ProbabilitySum { sum: f64, branches: Vec<f64> },

    #[error("{0} is not a legal option for this hand")]
    IllegalOption(OptionKind),
}
