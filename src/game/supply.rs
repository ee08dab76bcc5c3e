//! Supply layout: the shared acquirable piles and their remaining counts

use crate::core::CardId;
use crate::game::GameEndReason;
use crate::{KingdomError, Result};
use serde::{Deserialize, Serialize};

/// One acquirable pile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPile {
    pub card: CardId,
    /// Selection key used by console and remote participants
    pub key: char,
    pub remaining: u32,
}

/// Ordered list of supply piles
///
/// The remaining counts are the only mutable per-card data in the game.
/// They are only touched from the turn engine's single control path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Supply {
    piles: Vec<SupplyPile>,
    /// Emptying this pile ends the game on its own
    pub prestige: Option<CardId>,
}

impl Supply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pile at the end of the layout
    pub fn add(&mut self, card: CardId, key: char, remaining: u32) {
        self.piles.push(SupplyPile {
            card,
            key,
            remaining,
        });
    }

    pub fn pile(&self, card: CardId) -> Option<&SupplyPile> {
        self.piles.iter().find(|p| p.card == card)
    }

    /// Remaining count; 0 for cards not in the layout
    pub fn remaining(&self, card: CardId) -> u32 {
        self.pile(card).map(|p| p.remaining).unwrap_or(0)
    }

    pub fn set_remaining(&mut self, card: CardId, remaining: u32) {
        if let Some(pile) = self.piles.iter_mut().find(|p| p.card == card) {
            pile.remaining = remaining;
        }
    }

    /// Take one copy off a pile
    pub fn take(&mut self, card: CardId) -> Result<()> {
        match self.piles.iter_mut().find(|p| p.card == card) {
            Some(pile) if pile.remaining > 0 => {
                pile.remaining -= 1;
                Ok(())
            }
            _ => Err(KingdomError::SupplyExhausted(format!("card {card}"))),
        }
    }

    pub fn by_key(&self, key: char) -> Option<CardId> {
        self.piles.iter().find(|p| p.key == key).map(|p| p.card)
    }

    pub fn key_of(&self, card: CardId) -> Option<char> {
        self.pile(card).map(|p| p.key)
    }

    pub fn empty_piles(&self) -> usize {
        self.piles.iter().filter(|p| p.remaining == 0).count()
    }

    /// Why the game is over, if it is: the prestige pile is empty, or
    /// three distinct piles are
    pub fn end_reason(&self) -> Option<GameEndReason> {
        if self.prestige.is_some_and(|card| self.remaining(card) == 0) {
            Some(GameEndReason::PrestigePileEmpty)
        } else if self.empty_piles() >= 3 {
            Some(GameEndReason::ThreePilesEmpty)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupplyPile> {
        self.piles.iter()
    }

    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.piles.iter().map(|p| p.card)
    }

    pub fn len(&self) -> usize {
        self.piles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }
}
