//! Core game types: identities, cards, players

pub mod entity;
pub mod card;
pub mod player;

pub use entity::{CardId, PlayerId};
pub use card::{Card, CardKind, EffectFn, ReactionFn, ReactionOutcome, VpFn};
pub use player::Player;
