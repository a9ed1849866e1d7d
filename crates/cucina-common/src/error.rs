//! Error types for Cucina Clash.

use thiserror::Error;

/// Errors raised by fight lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FightError {
    /// Character id is not in the roster
    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    /// Operation needs fighters but character selection has not completed
    #[error("fighters have not been selected")]
    FightersNotSelected,
}

/// Result type alias for fight operations.
pub type FightResult<T> = Result<T, FightError>;
