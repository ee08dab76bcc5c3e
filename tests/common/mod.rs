//! Shared fixtures for the integration tests
#![allow(dead_code)]

use kingdom_forge::{
    cards::standard_catalog,
    core::{CardId, PlayerId},
    game::{GameState, VerbosityLevel},
    loader::{CardCatalog, GameConfig, GameInitializer},
};
use std::sync::Arc;

/// Kingdom used by the card scenarios
pub const KINGDOM: [&str; 10] = [
    "Bureaucrat",
    "Witch",
    "Moat",
    "Throne Room",
    "Feast",
    "Coppersmith",
    "Militia",
    "Smithy",
    "Village",
    "Market",
];

pub fn catalog() -> Arc<CardCatalog> {
    Arc::new(standard_catalog().expect("standard catalog builds"))
}

pub fn names(n: usize) -> Vec<String> {
    ["Alice", "Bob", "Carol", "Dave"][..n]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A dealt game over `KINGDOM` whose log is captured instead of printed
pub fn setup(players: usize, seed: u64) -> GameState {
    let config = GameConfig::new(
        names(players),
        KINGDOM.iter().map(|s| s.to_string()).collect(),
        seed,
    );
    let mut game = GameInitializer::new(catalog())
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&config)
        .expect("game initializes");
    game.logger.enable_capture();
    game
}

pub fn id(game: &GameState, name: &str) -> CardId {
    game.card_id(name).expect("known card")
}

pub fn ids(game: &GameState, names: &[&str]) -> Vec<CardId> {
    names.iter().map(|n| id(game, n)).collect()
}

/// Replace a player's hand and deck (first name on top) and empty the
/// other piles. The manifest is rebuilt to match.
pub fn arrange(game: &mut GameState, seat: u32, hand: &[&str], deck: &[&str]) {
    let hand = ids(game, hand);
    let deck = ids(game, deck);
    let p = game.player_mut(PlayerId::new(seat));
    p.played.clear();
    p.discard.clear();
    p.hand = hand.into();
    p.deck = deck.into();
    p.manifest = p.hand.iter().chain(p.deck.iter()).collect::<Vec<_>>().into();
}

pub fn seat(i: u32) -> PlayerId {
    PlayerId::new(i)
}
