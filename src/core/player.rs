//! Player representation

use crate::core::{CardId, PlayerId};
use crate::zones::Pile;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A participant's piles
///
/// The decision channel is not stored here: the turn engine holds one
/// controller per seat, indexed by `PlayerId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Front is the top of the deck
    pub deck: Pile,

    pub hand: Pile,

    /// Cards played this turn
    pub played: Pile,

    /// Back is the most recently discarded card
    pub discard: Pile,

    /// Every card this player currently owns, for end-of-game scoring.
    /// Gains add to it; trashing removes from it.
    pub manifest: Pile,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            deck: Pile::new(),
            hand: Pile::new(),
            played: Pile::new(),
            discard: Pile::new(),
            manifest: Pile::new(),
        }
    }

    /// Returns true if the deck is non-empty, shuffling the discard pile
    /// into a new deck first if necessary.
    pub fn maybe_shuffle(&mut self, rng: &mut impl Rng) -> bool {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return false;
            }
            self.deck = std::mem::take(&mut self.discard);
            self.deck.shuffle(rng);
        }
        true
    }

    /// Move the top card of the deck into hand (reshuffling if needed)
    pub fn draw_one(&mut self, rng: &mut impl Rng) -> Option<CardId> {
        if !self.maybe_shuffle(rng) {
            return None;
        }
        let card = self.deck.draw_top()?;
        self.hand.add(card);
        Some(card)
    }

    /// Played cards, then the remaining hand, go to the discard pile
    pub fn cleanup(&mut self) {
        let played = self.played.take_all();
        self.discard.extend(played);
        let hand = self.hand.take_all();
        self.discard.extend(hand);
    }

    /// Cards in deck, hand, played and discard
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.played.len() + self.discard.len()
    }

    pub fn has_in_hand(&self, card: CardId) -> bool {
        self.hand.contains(card)
    }
}
