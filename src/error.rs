//! Error types for Kingdom Forge

use crate::core::PlayerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KingdomError {
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Duplicate card definition: {0}")]
    DuplicateCard(String),

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Supply exhausted: {0}")]
    SupplyExhausted(String),

    /// A participant asked to end the match. Not a failure: the turn
    /// engine scores the game and reports it as the end reason.
    #[error("Player {0} quit the game")]
    Quit(PlayerId),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Script exhausted for player {0}")]
    ScriptExhausted(PlayerId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl KingdomError {
    /// True for errors that end the match after final scoring instead of
    /// aborting it.
    pub fn ends_match(&self) -> bool {
        matches!(self, KingdomError::Quit(_) | KingdomError::ProtocolViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, KingdomError>;
