//! Kingdom Forge - a turn-based deck-building card game engine
//!
//! Cards are data plus behavior hooks registered by name. The turn engine
//! runs Action, Buy and Cleanup phases for 2 to 4 seats and routes every
//! decision through one request/answer rendezvous, so console players,
//! bots, mailbox threads and TCP participants are interchangeable.

pub mod cards;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod remote;
pub mod tournament;
pub mod zones;

pub use error::{KingdomError, Result};
