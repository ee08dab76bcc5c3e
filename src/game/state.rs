//! Main game state structure

use crate::core::{Card, CardId, Player, PlayerId};
use crate::game::{GameLogger, Phase, Supply};
use crate::loader::CardCatalog;
use crate::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

/// Per-turn counters and the phase pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Player whose turn it is
    pub active: PlayerId,

    pub phase: Phase,

    pub actions: u32,
    pub buys: u32,
    pub coins: u32,

    /// Action cards played this turn. Differs from actions spent when a
    /// card plays another card several times.
    pub actions_played: u32,

    /// Subtracted from every cost this turn (never below 0)
    pub discount: u32,

    /// Extra coins each Copper produces this turn
    pub copper_bonus: u32,

    /// Turns started so far, across all players (1-based once play begins)
    pub turn_number: u32,
}

impl TurnState {
    pub fn new(first: PlayerId) -> Self {
        TurnState {
            active: first,
            phase: Phase::Action,
            actions: 1,
            buys: 1,
            coins: 0,
            actions_played: 0,
            discount: 0,
            copper_bonus: 0,
            turn_number: 0,
        }
    }

    /// Reset the counters for `player`'s turn
    pub fn start(&mut self, player: PlayerId) {
        self.active = player;
        self.phase = Phase::Action;
        self.actions = 1;
        self.buys = 1;
        self.coins = 0;
        self.actions_played = 0;
        self.discount = 0;
        self.copper_bonus = 0;
        self.turn_number += 1;
    }
}

/// Complete game state
///
/// The catalog is shared; everything else is owned by this match. All
/// mutation happens on the turn engine's single control path.
#[derive(Debug)]
pub struct GameState {
    pub catalog: Arc<CardCatalog>,

    /// Players in seating order, indexed by `PlayerId`
    pub players: Vec<Player>,

    pub supply: Supply,

    /// Cards permanently removed from play
    pub trash: crate::zones::Pile,

    pub turn: TurnState,

    /// Shuffling RNG. Interior mutability lets a draw borrow the RNG
    /// alongside a player's piles.
    pub rng: RefCell<ChaCha12Rng>,

    pub logger: GameLogger,
}

impl GameState {
    /// Create a game with empty piles and an empty supply
    pub fn new(catalog: Arc<CardCatalog>, names: &[String], seed: u64) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::new(i as u32), name.clone()))
            .collect();

        GameState {
            catalog,
            players,
            supply: Supply::new(),
            trash: crate::zones::Pile::new(),
            turn: TurnState::new(PlayerId::new(0)),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(seed)),
            logger: GameLogger::new(),
        }
    }

    pub fn card(&self, id: CardId) -> &Card {
        self.catalog.card(id)
    }

    pub fn card_name(&self, id: CardId) -> &str {
        self.catalog.name(id)
    }

    /// Look up a card by name; unknown names are an error
    pub fn card_id(&self, name: &str) -> Result<CardId> {
        self.catalog.lookup(name)
    }

    pub fn card_by_key(&self, key: char) -> Option<CardId> {
        self.supply.by_key(key)
    }

    /// Effective cost after this turn's discount
    pub fn cost(&self, id: CardId) -> u32 {
        self.card(id).cost.saturating_sub(self.turn.discount)
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn player_name(&self, id: PlayerId) -> &str {
        &self.player(id).name
    }

    /// Seats after `player`, in turn order, wrapping around
    pub fn others(&self, player: PlayerId) -> Vec<PlayerId> {
        let n = self.players.len() as u32;
        (1..n)
            .map(|offset| PlayerId::new((player.as_u32() + offset) % n))
            .collect()
    }

    /// Move up to `count` cards from deck to hand, reshuffling the discard
    /// pile when the deck runs out. Returns how many were drawn.
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> usize {
        let mut rng = self.rng.borrow_mut();
        let p = &mut self.players[player.index()];
        let mut drawn = 0;
        while drawn < count && p.draw_one(&mut *rng).is_some() {
            drawn += 1;
        }
        drawn
    }

    /// Reshuffle if needed; true if the deck has a card
    pub fn maybe_shuffle(&mut self, player: PlayerId) -> bool {
        let mut rng = self.rng.borrow_mut();
        self.players[player.index()].maybe_shuffle(&mut *rng)
    }

    pub fn shuffle_deck(&mut self, player: PlayerId) {
        let mut rng = self.rng.borrow_mut();
        self.players[player.index()].deck.shuffle(&mut *rng);
    }

    /// True if any card in `player`'s hand satisfies `pred`
    pub fn hand_has(&self, player: PlayerId, pred: impl Fn(&Card) -> bool) -> bool {
        self.player(player).hand.iter().any(|id| pred(self.card(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_catalog;

    fn game(n: usize) -> GameState {
        let names: Vec<String> = ["Alice", "Bob", "Carol", "Dave"][..n]
            .iter()
            .map(|s| s.to_string())
            .collect();
        GameState::new(Arc::new(standard_catalog().unwrap()), &names, 42)
    }

    #[test]
    fn test_others_in_seat_order() {
        let game = game(4);
        let order = game.others(PlayerId::new(2));
        assert_eq!(
            order,
            vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(1)]
        );
    }

    #[test]
    fn test_cost_with_discount() {
        let mut game = game(2);
        let copper = game.card_id("Copper").unwrap();
        let smithy = game.card_id("Smithy").unwrap();

        game.turn.discount = 2;
        assert_eq!(game.cost(smithy), 2);
        assert_eq!(game.cost(copper), 0);
    }

    #[test]
    fn test_turn_start_resets_counters() {
        let mut turn = TurnState::new(PlayerId::new(0));
        turn.actions = 0;
        turn.coins = 7;
        turn.discount = 1;
        turn.copper_bonus = 2;
        turn.phase = Phase::Cleanup;

        turn.start(PlayerId::new(1));
        assert_eq!(turn.active, PlayerId::new(1));
        assert_eq!((turn.actions, turn.buys, turn.coins), (1, 1, 0));
        assert_eq!((turn.discount, turn.copper_bonus), (0, 0));
        assert_eq!(turn.phase, Phase::Action);
        assert_eq!(turn.turn_number, 1);
    }

    #[test]
    fn test_draw_cards_stops_when_empty() {
        let mut game = game(2);
        let copper = game.card_id("Copper").unwrap();
        let alice = PlayerId::new(0);
        game.player_mut(alice).discard.extend([copper, copper]);

        assert_eq!(game.draw_cards(alice, 5), 2);
        assert_eq!(game.player(alice).hand.len(), 2);
    }
}
