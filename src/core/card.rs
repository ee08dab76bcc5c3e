//! Card definitions and category tags

use crate::core::{CardId, PlayerId};
use crate::game::{GameLoop, GameState};
use crate::{KingdomError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Category tags. Tags drive eligibility rules (what can be played in which
/// phase, what counts for scoring, what can react to an attack); a card may
/// carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Treasure,
    Victory,
    Curse,
    Action,
    Attack,
    Reaction,
}

impl FromStr for CardKind {
    type Err = KingdomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Treasure" => Ok(CardKind::Treasure),
            "Victory" => Ok(CardKind::Victory),
            "Curse" => Ok(CardKind::Curse),
            "Action" => Ok(CardKind::Action),
            "Attack" => Ok(CardKind::Attack),
            "Reaction" => Ok(CardKind::Reaction),
            _ => Err(KingdomError::InvalidCardFormat(format!("no such kind: {s}"))),
        }
    }
}

/// One effect unit: runs against the engine when the card is played.
///
/// Numeric bonuses ("+1 card", "+$2") are effect units too; they are built
/// from the card table when the catalog is loaded.
pub type EffectFn = Arc<dyn Fn(&mut GameLoop<'_>) -> Result<()> + Send + Sync>;

/// Victory points one copy of a card is worth to its owner at game end.
pub type VpFn = Arc<dyn Fn(&GameState, PlayerId) -> i32 + Send + Sync>;

/// Behavior of a reaction card revealed by `PlayerId` in response to an attack.
pub type ReactionFn = Arc<dyn Fn(&mut GameLoop<'_>, PlayerId) -> Result<ReactionOutcome> + Send + Sync>;

/// What a revealed reaction does to the attack that provoked it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionOutcome {
    /// The attack's consequence is skipped for the revealing player
    Block,
    /// The reaction had its own effect; the attack still lands
    Continue,
}

/// An immutable card definition, shared by every pile that holds the card
pub struct Card {
    pub id: CardId,

    /// Card name (e.g., "Throne Room")
    pub name: String,

    /// Base acquisition cost, before per-turn discounts
    pub cost: u32,

    pub kinds: SmallVec<[CardKind; 2]>,

    /// Effect units in registration order
    pub effects: Vec<EffectFn>,

    pub vp: Option<VpFn>,

    pub reaction: Option<ReactionFn>,

    /// A registered closure was appended after the literal bonuses
    pub custom_effect: bool,

    /// VP comes from a registered function rather than a literal `#n`
    pub custom_vp: bool,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, cost: u32) -> Self {
        Card {
            id,
            name: name.into(),
            cost,
            kinds: SmallVec::new(),
            effects: Vec::new(),
            vp: None,
            reaction: None,
            custom_effect: false,
            custom_vp: false,
        }
    }

    pub fn has_kind(&self, kind: CardKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_action(&self) -> bool {
        self.has_kind(CardKind::Action)
    }

    pub fn is_treasure(&self) -> bool {
        self.has_kind(CardKind::Treasure)
    }

    pub fn is_victory(&self) -> bool {
        self.has_kind(CardKind::Victory)
    }

    pub fn is_curse(&self) -> bool {
        self.has_kind(CardKind::Curse)
    }

    pub fn is_attack(&self) -> bool {
        self.has_kind(CardKind::Attack)
    }

    pub fn is_reaction(&self) -> bool {
        self.has_kind(CardKind::Reaction)
    }

    /// Counted at game end (victory and curse cards)
    pub fn is_scoring(&self) -> bool {
        self.is_victory() || self.is_curse()
    }

    pub fn has_custom_effect(&self) -> bool {
        self.custom_effect
    }

    pub fn has_custom_vp(&self) -> bool {
        self.custom_vp
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("kinds", &self.kinds)
            .field("effects", &self.effects.len())
            .field("vp", &self.vp.is_some())
            .field("reaction", &self.reaction.is_some())
            .finish()
    }
}
