//! Random AI controller for testing and baseline gameplay
//!
//! Makes uniform random choices among commands the engine will accept.
//! Serves as a baseline for the heuristic bot and as a fuzzer for card
//! effects.

use crate::core::{CardId, PlayerId};
use crate::game::controller::{Command, DecisionKind, DecisionRequest, GameStateView, PlayerController};
use crate::game::Phase;
use crate::loader::CardCatalog;
use crate::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// A controller that makes random legal choices
pub struct RandomController {
    player_id: PlayerId,
    catalog: Arc<CardCatalog>,
    rng: StdRng,
}

impl RandomController {
    /// Create a new random controller with an entropy-seeded RNG
    pub fn new(player_id: PlayerId, catalog: Arc<CardCatalog>) -> Self {
        RandomController {
            player_id,
            catalog,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, catalog: Arc<CardCatalog>, seed: u64) -> Self {
        RandomController {
            player_id,
            catalog,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Every top-level command the phase rules accept right now
    fn turn_options(&self, view: &GameStateView) -> Vec<Command> {
        let mut options = vec![Command::Advance];
        match view.phase {
            Phase::Action if view.actions > 0 => {
                options.extend(
                    view.hand
                        .iter()
                        .filter(|&&c| self.catalog.card(c).is_action())
                        .map(|&c| Command::Play(c)),
                );
            }
            Phase::Buy => {
                options.extend(
                    view.hand
                        .iter()
                        .filter(|&&c| self.catalog.card(c).is_treasure())
                        .map(|&c| Command::Play(c)),
                );
                if view.buys > 0 {
                    options.extend(
                        view.supply
                            .iter()
                            .filter(|e| view.can_afford(e.card))
                            .map(|e| Command::Buy(e.card)),
                    );
                }
            }
            _ => {}
        }
        options
    }

    fn pick(&mut self, cards: &[CardId], or_done: bool) -> Command {
        let mut options: Vec<Command> = cards.iter().map(|&c| Command::Pick(c)).collect();
        if or_done || options.is_empty() {
            options.push(Command::Done);
        }
        *options.choose(&mut self.rng).unwrap_or(&Command::Done)
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        let command = match &request.kind {
            DecisionKind::Turn { .. } => {
                let options = self.turn_options(view);
                *options.choose(&mut self.rng).unwrap_or(&Command::Advance)
            }
            DecisionKind::PickCards {
                eligible, exact, ..
            } => self.pick(eligible, !exact),
            DecisionKind::PickSupply {
                options,
                allow_none,
            } => self.pick(options, *allow_none),
            DecisionKind::YesNo => {
                if self.rng.gen_bool(0.5) {
                    Command::Yes
                } else {
                    Command::Done
                }
            }
            DecisionKind::Menu { options, chosen, .. } => {
                let open: Vec<usize> = (0..options.len()).filter(|i| !chosen.contains(i)).collect();
                Command::Option(*open.choose(&mut self.rng).unwrap_or(&0))
            }
        };
        Ok(command)
    }
}
