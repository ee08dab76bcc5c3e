//! Turn engine, effect stack, choice protocol and participants

pub mod actions;
pub mod attack;
pub mod channel_controller;
pub mod choice;
pub mod controller;
pub mod events;
pub mod game_loop;
pub mod heuristic_controller;
pub mod interactive_controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
pub mod scoring;
pub mod scripted_controller;
pub mod stack;
pub mod state;
pub mod supply;

pub use actions::GainDestination;
pub use channel_controller::{spawn_participant, ChannelController, Mail};
pub use choice::{PickOptions, SupplyOptions};
pub use controller::{
    Command, DecisionKind, DecisionRequest, GameStateView, PlayerController, PlayerSummary, SupplyEntry,
};
pub use events::GameEvent;
pub use game_loop::{GameLoop, VerbosityLevel};
pub use heuristic_controller::HeuristicController;
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode};
pub use phase::Phase;
pub use random_controller::RandomController;
pub use scoring::{format_report, score_players, GameEndReason, GameReport, PlayerScore, ScoreLine};
pub use scripted_controller::ScriptedController;
pub use stack::{EffectStack, Frame, Prompt};
pub use state::{GameState, TurnState};
pub use supply::{Supply, SupplyPile};
