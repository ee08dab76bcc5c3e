//! Turn phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a turn, in order. Cleanup always hands over to the next
/// player's Action phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Action,
    Buy,
    Cleanup,
}

impl Phase {
    /// Get the next phase within the turn (None after Cleanup)
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Action => Some(Phase::Buy),
            Phase::Buy => Some(Phase::Cleanup),
            Phase::Cleanup => None,
        }
    }

    /// Phases where the active player is asked for commands
    pub fn is_interactive(&self) -> bool {
        matches!(self, Phase::Action | Phase::Buy)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Action => "Action",
            Phase::Buy => "Buy",
            Phase::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}
