//! Card and game loaders
//!
//! Parsers for the declarative card table format, the catalog built from
//! card sets, and game bootstrap from a kingdom configuration

pub mod card;
pub mod database;
pub mod game_init;

pub use card::{Bonus, CardLoader, CardSpec};
pub use database::{CardCatalog, CardSet, CatalogBuilder};
pub use game_init::{find_preset, presets, GameConfig, GameInitializer, Preset, KINGDOM_SIZE};
