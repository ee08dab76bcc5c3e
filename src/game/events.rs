//! Notifications broadcast to every participant
//!
//! Events are advisory: participants may render them or keep their own
//! bookkeeping, but nothing they do with an event feeds back into the engine.

use crate::core::{CardId, PlayerId};
use crate::game::Phase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// One notification per draw request, carrying the number actually drawn
    Draw { player: PlayerId, count: usize },
    Gain { player: PlayerId, card: CardId },
    Trash { player: PlayerId, card: CardId },
    Discard { player: PlayerId, count: usize },
    /// The whole deck went to the discard pile
    DiscardDeck { player: PlayerId, count: usize },
    /// Once per phase transition
    Phase { player: PlayerId, phase: Phase },
    Reveal { player: PlayerId, card: CardId },
    Play { player: PlayerId, card: CardId },
    Buy { player: PlayerId, card: CardId },
}

impl GameEvent {
    /// The player the event is about
    pub fn player(&self) -> PlayerId {
        match self {
            GameEvent::Draw { player, .. }
            | GameEvent::Gain { player, .. }
            | GameEvent::Trash { player, .. }
            | GameEvent::Discard { player, .. }
            | GameEvent::DiscardDeck { player, .. }
            | GameEvent::Phase { player, .. }
            | GameEvent::Reveal { player, .. }
            | GameEvent::Play { player, .. }
            | GameEvent::Buy { player, .. } => *player,
        }
    }
}
