//! Game initialization from a kingdom and a seat list
//!
//! Sizes the supply for the player count, lays out the piles with their
//! selection keys and deals every player the starting deck.

use crate::core::PlayerId;
use crate::game::{GameState, OutputFormat, VerbosityLevel};
use crate::loader::CardCatalog;
use crate::{KingdomError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Keys for the ten kingdom piles, in layout order
const KINGDOM_KEYS: &str = "asdfgzxcvb";

pub const KINGDOM_SIZE: usize = 10;

/// Library-level match configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Player names in seat order
    pub players: Vec<String>,
    /// The ten kingdom card names
    pub kingdom: Vec<String>,
    pub seed: u64,
    pub max_turns: u32,
}

impl GameConfig {
    pub fn new(players: Vec<String>, kingdom: Vec<String>, seed: u64) -> Self {
        GameConfig {
            players,
            kingdom,
            seed,
            max_turns: 1000,
        }
    }

    /// Configuration for a named preset kingdom
    pub fn from_preset(players: Vec<String>, preset: &str, seed: u64) -> Result<Self> {
        let preset = find_preset(preset)?;
        Ok(Self::new(
            players,
            preset.cards.iter().map(|s| s.to_string()).collect(),
            seed,
        ))
    }
}

/// A named, recommended kingdom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub cards: [&'static str; KINGDOM_SIZE],
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "First Game",
        cards: [
            "Cellar", "Market", "Militia", "Mine", "Moat", "Remodel", "Smithy", "Village", "Woodcutter",
            "Workshop",
        ],
    },
    Preset {
        name: "Big Money",
        cards: [
            "Adventurer", "Bureaucrat", "Chancellor", "Chapel", "Feast", "Laboratory", "Market", "Mine",
            "Moneylender", "Throne Room",
        ],
    },
    Preset {
        name: "Interaction",
        cards: [
            "Bureaucrat", "Chancellor", "Council Room", "Festival", "Library", "Militia", "Moat", "Spy",
            "Thief", "Village",
        ],
    },
    Preset {
        name: "Size Distortion",
        cards: [
            "Cellar", "Chapel", "Feast", "Gardens", "Laboratory", "Thief", "Village", "Witch", "Woodcutter",
            "Workshop",
        ],
    },
    Preset {
        name: "Village Square",
        cards: [
            "Bureaucrat", "Cellar", "Festival", "Library", "Market", "Remodel", "Smithy", "Throne Room",
            "Village", "Woodcutter",
        ],
    },
    Preset {
        name: "Test",
        cards: [
            "Courtyard", "Pawn", "Shanty Town", "Steward", "Minion", "Harem", "Nobles", "Village",
            "Woodcutter", "Workshop",
        ],
    },
    Preset {
        name: "Counterplay",
        cards: [
            "Moat", "Secret Chamber", "Baron", "Bridge", "Coppersmith", "Ironworks", "Militia", "Torturer",
            "Witch", "Duke",
        ],
    },
];

pub fn presets() -> &'static [Preset] {
    PRESETS
}

/// Look up a preset by name, ignoring case
pub fn find_preset(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| KingdomError::InvalidConfig(format!("no such preset: {name}")))
}

/// Game builder for initializing games from a configuration
pub struct GameInitializer {
    catalog: Arc<CardCatalog>,
    verbosity: VerbosityLevel,
    format: OutputFormat,
}

impl GameInitializer {
    /// Create a new game initializer over a card catalog
    pub fn new(catalog: Arc<CardCatalog>) -> Self {
        GameInitializer {
            catalog,
            verbosity: VerbosityLevel::default(),
            format: OutputFormat::Text,
        }
    }

    /// Logger verbosity for games built from here on
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the supply and deal starting decks. The first seat is active.
    pub fn init_game(&self, config: &GameConfig) -> Result<GameState> {
        let n = config.players.len();
        if !(2..=4).contains(&n) {
            return Err(KingdomError::InvalidConfig(format!(
                "{n} players; 2 to 4 are supported"
            )));
        }
        if config.kingdom.len() != KINGDOM_SIZE {
            return Err(KingdomError::InvalidConfig(format!(
                "kingdom has {} cards, expected {KINGDOM_SIZE}",
                config.kingdom.len()
            )));
        }

        let mut game = GameState::new(Arc::clone(&self.catalog), &config.players, config.seed);
        game.logger.set_verbosity(self.verbosity);
        game.logger.set_output_format(self.format);
        let victory_count = if n == 2 { 8 } else { 12 };
        let n = n as u32;

        let basics = [
            ("Copper", '1', 60 - 7 * n),
            ("Silver", '2', 40),
            ("Gold", '3', 30),
            ("Estate", 'q', victory_count),
            ("Duchy", 'w', victory_count),
            ("Province", 'e', victory_count),
            ("Curse", '!', 10 * (n - 1)),
        ];
        for (name, key, count) in basics {
            let id = self.catalog.lookup(name)?;
            game.supply.add(id, key, count);
        }
        game.supply.prestige = Some(self.catalog.lookup("Province")?);

        let mut kingdom = Vec::with_capacity(KINGDOM_SIZE);
        for name in &config.kingdom {
            let id = self.catalog.lookup(name)?;
            if game.supply.pile(id).is_some() || kingdom.contains(&id) {
                return Err(KingdomError::InvalidConfig(format!(
                    "{name} appears twice in the supply"
                )));
            }
            kingdom.push(id);
        }
        kingdom.sort_by(|&a, &b| {
            let (a, b) = (self.catalog.card(a), self.catalog.card(b));
            (a.cost, &a.name).cmp(&(b.cost, &b.name))
        });
        for (id, key) in kingdom.into_iter().zip(KINGDOM_KEYS.chars()) {
            let count = if self.catalog.card(id).is_victory() {
                victory_count
            } else {
                10
            };
            game.supply.add(id, key, count);
        }

        let copper = self.catalog.lookup("Copper")?;
        let estate = self.catalog.lookup("Estate")?;
        for seat in 0..n {
            let player = PlayerId::new(seat);
            let p = game.player_mut(player);
            let start: Vec<_> = std::iter::repeat(copper)
                .take(7)
                .chain(std::iter::repeat(estate).take(3))
                .collect();
            p.manifest.extend(start.iter().copied());
            p.deck.extend(start);
            game.shuffle_deck(player);
            game.draw_cards(player, 5);
        }

        game.logger.normal(&format!(
            "Supply: {}",
            game.supply
                .iter()
                .map(|pile| format!("[{}] {}", pile.key, game.card_name(pile.card)))
                .collect::<Vec<_>>()
                .join(" ")
        ));
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_catalog;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{i}")).collect()
    }

    fn init(n: usize, preset: &str) -> Result<GameState> {
        let catalog = Arc::new(standard_catalog()?);
        let config = GameConfig::from_preset(names(n), preset, 11)?;
        GameInitializer::new(catalog).init_game(&config)
    }

    #[test]
    fn test_three_player_supply() {
        let game = init(3, "size distortion").unwrap();
        let id = |name: &str| game.card_id(name).unwrap();

        assert_eq!(game.supply.remaining(id("Copper")), 39);
        assert_eq!(game.supply.remaining(id("Province")), 12);
        assert_eq!(game.supply.remaining(id("Curse")), 20);
        // Victory kingdom piles use the victory count
        assert_eq!(game.supply.remaining(id("Gardens")), 12);
        assert_eq!(game.supply.remaining(id("Witch")), 10);
        assert_eq!(game.supply.prestige, Some(id("Province")));
        assert_eq!(game.supply.len(), 17);

        // Sorted by (cost, name): Cellar and Chapel cost 2
        assert_eq!(game.supply.by_key('a'), Some(id("Cellar")));
        assert_eq!(game.supply.by_key('s'), Some(id("Chapel")));
        assert_eq!(game.supply.by_key('b'), Some(id("Witch")));
    }

    #[test]
    fn test_starting_decks() {
        let game = init(2, "First Game").unwrap();
        for player in &game.players {
            assert_eq!(player.hand.len(), 5);
            assert_eq!(player.deck.len(), 5);
            assert_eq!(player.manifest.len(), 10);
            assert_eq!(player.card_count(), 10);
        }
        // Starting cards do not come out of the supply
        let copper = game.card_id("Copper").unwrap();
        assert_eq!(game.supply.remaining(copper), 46);
    }

    #[test]
    fn test_rejects_bad_configs() {
        assert!(matches!(init(1, "First Game"), Err(KingdomError::InvalidConfig(_))));
        assert!(matches!(init(5, "First Game"), Err(KingdomError::InvalidConfig(_))));
        assert!(matches!(init(2, "No Such Preset"), Err(KingdomError::InvalidConfig(_))));

        let catalog = Arc::new(standard_catalog().unwrap());
        let mut kingdom: Vec<String> = find_preset("Test").unwrap().cards.iter().map(|s| s.to_string()).collect();
        kingdom[0] = "Village".to_string();
        let config = GameConfig::new(names(2), kingdom, 0);
        assert!(matches!(
            GameInitializer::new(catalog).init_game(&config),
            Err(KingdomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_every_preset_is_valid() {
        for preset in presets() {
            init(4, preset.name).unwrap();
        }
    }
}
