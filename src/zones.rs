//! Card piles (deck, hand, played, discard, trash, manifest)

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// An ordered sequence of card references
///
/// Used as a stack when it is a deck (front = top) and as a queue when it
/// is a discard pile (new cards pushed to the back). Piles hold `CardId`s,
/// never card definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<CardId>,
}

impl Pile {
    pub fn new() -> Self {
        Pile { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<CardId>) -> Self {
        Pile { cards }
    }

    /// Push to the back
    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    /// Remove the first copy of `card_id`. Returns false if the pile holds none.
    pub fn remove(&mut self, card_id: CardId) -> bool {
        // Order-preserving remove: hands are shown to participants in a
        // stable order and key-based selection depends on it.
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    /// Number of copies of `card_id`
    pub fn count(&self, card_id: CardId) -> usize {
        self.cards.iter().filter(|&&id| id == card_id).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Take the top card of a deck
    pub fn draw_top(&mut self) -> Option<CardId> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.first().copied()
    }

    /// Most recently added card (top of a discard pile)
    pub fn peek_last(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn put_on_top(&mut self, card_id: CardId) {
        self.cards.insert(0, card_id);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Empty the pile, returning its cards in order
    pub fn take_all(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.cards)
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    pub fn to_vec(&self) -> Vec<CardId> {
        self.cards.clone()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl From<Vec<CardId>> for Pile {
    fn from(cards: Vec<CardId>) -> Self {
        Pile::from_cards(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_add_remove() {
        let mut pile = Pile::new();
        assert!(pile.is_empty());

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);

        pile.add(card1);
        pile.add(card2);
        pile.add(card1);

        assert_eq!(pile.len(), 3);
        assert_eq!(pile.count(card1), 2);

        assert!(pile.remove(card1));
        assert_eq!(pile.as_slice(), &[card2, card1]);
        assert!(!pile.remove(CardId::new(99)));
    }

    #[test]
    fn test_deck_operations() {
        let card1 = CardId::new(10);
        let card2 = CardId::new(11);
        let card3 = CardId::new(12);
        let mut deck = Pile::from_cards(vec![card1, card2]);

        deck.put_on_top(card3);
        assert_eq!(deck.peek_top(), Some(card3));
        assert_eq!(deck.draw_top(), Some(card3));
        assert_eq!(deck.draw_top(), Some(card1));
        assert_eq!(deck.draw_top(), Some(card2));
        assert_eq!(deck.draw_top(), None);
    }

    #[test]
    fn test_take_all_empties() {
        let mut pile = Pile::from_cards(vec![CardId::new(1), CardId::new(2)]);
        let taken = pile.take_all();
        assert_eq!(taken.len(), 2);
        assert!(pile.is_empty());
        assert_eq!(pile.peek_last(), None);
    }
}
