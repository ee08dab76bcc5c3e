//! Game loop implementation
//!
//! Drives turns, phases and the single decision rendezvous every other
//! part of the engine goes through.

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating all format! allocations in the hot turn loop.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.game.logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::core::PlayerId;
use crate::game::controller::{Command, DecisionKind, DecisionRequest, GameStateView, PlayerController};
use crate::game::scoring::{format_report, score_players, winner, GameEndReason, GameReport};
use crate::game::stack::EffectStack;
use crate::game::{GameEvent, GameState, Phase};
use crate::{KingdomError, Result};

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome and diagnostics
    Minimal = 1,
    /// Normal - turns, phases, events and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - also rejected commands and forced choices
    Verbose = 3,
}

/// Game loop manager
///
/// Holds the match state, one controller per seat and the effect stack.
/// Card effects receive `&mut GameLoop` so they can move cards, change
/// counters, ask for decisions and play other cards.
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// One controller per seat, indexed by `PlayerId`
    controllers: Vec<&'a mut dyn PlayerController>,
    /// Cards currently resolving
    pub stack: EffectStack,
    /// Maximum turns before the match is stopped
    max_turns: u32,
    /// Turn counter for the loop
    turns_elapsed: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
    /// Decisions requested so far, rejected ones included
    choice_counter: u32,
    /// Player most recently asked for a decision
    addressed: Option<PlayerId>,
}

impl<'a> GameLoop<'a> {
    /// Create a game loop over `game`, with controllers in seat order
    pub fn new(game: &'a mut GameState, controllers: Vec<&'a mut dyn PlayerController>) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            controllers,
            stack: EffectStack::new(),
            max_turns: 1000,
            turns_elapsed: 0,
            verbosity,
            choice_counter: 0,
            addressed: None,
        }
    }

    /// Set maximum turns before the match ends with `TurnLimit`
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity level for output
    ///
    /// This sets the verbosity on both the game loop and the game's centralized logger.
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    pub fn turns_elapsed(&self) -> u32 {
        self.turns_elapsed
    }

    pub fn choice_count(&self) -> u32 {
        self.choice_counter
    }

    /// The player whose turn it is
    pub fn active(&self) -> PlayerId {
        self.game.turn.active
    }

    fn controller(&mut self, player: PlayerId) -> Result<&mut (dyn PlayerController + 'a)> {
        match self.controllers.get_mut(player.index()) {
            Some(c) => Ok(&mut **c),
            None => Err(KingdomError::InvalidConfig(format!(
                "no controller for player {player}"
            ))),
        }
    }

    fn check_seats(&self) -> Result<()> {
        if self.controllers.len() != self.game.players.len() {
            return Err(KingdomError::InvalidConfig(format!(
                "{} players but {} controllers",
                self.game.players.len(),
                self.controllers.len()
            )));
        }
        for (i, controller) in self.controllers.iter().enumerate() {
            if controller.player_id().index() != i {
                return Err(KingdomError::InvalidConfig(format!(
                    "controller for player {} sits in seat {i}",
                    controller.player_id()
                )));
            }
        }
        Ok(())
    }

    /// Send an event to every participant and the log
    pub fn report(&mut self, event: GameEvent) {
        let text = self.describe(&event);
        self.game.logger.event(&event, &text);
        for controller in self.controllers.iter_mut() {
            controller.on_event(&event);
        }
    }

    fn describe(&self, event: &GameEvent) -> String {
        let game = &*self.game;
        let name = game.player_name(event.player());
        match event {
            GameEvent::Draw { count, .. } => format!("{name} draws {count} cards"),
            GameEvent::Gain { card, .. } => format!("{name} gains {}", game.card_name(*card)),
            GameEvent::Trash { card, .. } => format!("{name} trashes {}", game.card_name(*card)),
            GameEvent::Discard { count, player } => match game.player(*player).discard.peek_last() {
                Some(top) => format!("{name} discards {count} cards ({})", game.card_name(top)),
                None => format!("{name} discards {count} cards"),
            },
            GameEvent::DiscardDeck { count, .. } => format!("{name} discards deck; {count} cards"),
            GameEvent::Phase { phase, .. } => format!("{name}: {phase} phase"),
            GameEvent::Reveal { card, .. } => format!("{name} reveals {}", game.card_name(*card)),
            GameEvent::Play { card, .. } => format!("{name} plays {}", game.card_name(*card)),
            GameEvent::Buy { card, .. } => format!(
                "{name} buys {} for ${}",
                game.card_name(*card),
                game.cost(*card)
            ),
        }
    }

    fn build_request(&self, player: PlayerId) -> DecisionRequest {
        let card = self.stack.top().map(|frame| frame.card);
        match self.stack.active_prompt() {
            Some(prompt) => DecisionRequest {
                player,
                kind: prompt.kind.clone(),
                card,
                prompt: prompt.text.clone(),
            },
            None => {
                let phase = self.game.turn.phase;
                DecisionRequest {
                    player,
                    kind: DecisionKind::Turn { phase },
                    card: None,
                    prompt: format!("{phase} phase"),
                }
            }
        }
    }

    /// Validate a top-level command (no prompt installed)
    fn interpret_turn_command(
        &self,
        player: PlayerId,
        command: &Command,
    ) -> std::result::Result<Command, String> {
        if player != self.game.turn.active {
            return Err("not your turn".to_string());
        }
        match command {
            Command::Play(card) => self.can_play(player, *card).map(|_| *command),
            Command::Buy(card) => self.can_buy(*card).map(|_| *command),
            Command::Advance => Ok(Command::Advance),
            _ => Err("unrecognized command".to_string()),
        }
    }

    /// Ask `player` for one command and validate it
    ///
    /// The active prompt's interpreter validates the answer; with no prompt
    /// installed the phase rules do. Rejected answers go back to the same
    /// participant, which is asked again; no state changes in between.
    /// `Quit` is never rejected: it ends the match.
    pub fn request_command(&mut self, player: PlayerId) -> Result<Command> {
        loop {
            let request = self.build_request(player);
            let view = GameStateView::new(self.game, player);
            self.addressed = Some(player);
            self.choice_counter += 1;

            let command = self.controller(player)?.next_command(&view, &request)?;
            if command == Command::Quit {
                self.game
                    .logger
                    .minimal(&format!("{} quits", self.game.player_name(player)));
                return Err(KingdomError::Quit(player));
            }

            let verdict = match self.stack.active_prompt() {
                Some(prompt) => (prompt.interpreter)(self.game, &command),
                None => self.interpret_turn_command(player, &command),
            };

            match verdict {
                Ok(command) => return Ok(command),
                Err(reason) => {
                    self.game.logger.rejected(&format!(
                        "{}: {command:?} rejected: {reason}",
                        self.game.player_name(player)
                    ));
                    self.controller(player)?.on_rejected(&command, &reason);
                }
            }
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.game.turn.phase = phase;
    }

    /// Run one full turn for `player`: Action, Buy, Cleanup, then the end
    /// check. Returns the end reason if the game is over.
    pub fn run_turn(&mut self, player: PlayerId) -> Result<Option<GameEndReason>> {
        self.game.turn.start(player);
        self.game.logger.normal(&format!(
            "Turn {}: {}",
            self.game.turn.turn_number,
            self.game.player_name(player)
        ));

        let mut announced = None;
        loop {
            let phase = self.game.turn.phase;
            if announced != Some(phase) {
                self.report(GameEvent::Phase { player, phase });
                announced = Some(phase);
            }

            let exhausted = match phase {
                Phase::Action => self.game.turn.actions == 0,
                Phase::Buy => self.game.turn.buys == 0,
                Phase::Cleanup => break,
            };
            if exhausted {
                if let Some(next) = phase.next() {
                    self.enter_phase(next);
                }
                continue;
            }

            match self.request_command(player)? {
                Command::Play(card) => self.play(card)?,
                Command::Buy(card) => self.buy(card)?,
                Command::Advance => {
                    if let Some(next) = phase.next() {
                        self.enter_phase(next);
                    }
                }
                other => {
                    return Err(KingdomError::InvalidAction(format!(
                        "{other:?} accepted outside a choice"
                    )))
                }
            }
        }

        self.game.player_mut(player).cleanup();
        log_if_verbose!(
            self,
            "{} cleans up: {} cards",
            self.game.player_name(player),
            self.game.player(player).card_count()
        );

        if let Some(reason) = self.check_end() {
            return Ok(Some(reason));
        }
        self.draw(player, 5);
        Ok(None)
    }

    /// Supply-based end condition, checked once per Cleanup
    pub fn check_end(&self) -> Option<GameEndReason> {
        self.game.supply.end_reason()
    }

    /// Run turns in seat order, starting with the current active player,
    /// until the game ends; then score and notify every participant.
    pub fn run_game(&mut self) -> Result<GameReport> {
        self.check_seats()?;

        let seats = self.game.players.len() as u32;
        let mut seat = self.game.turn.active.as_u32();
        let end_reason = loop {
            if self.turns_elapsed >= self.max_turns {
                break GameEndReason::TurnLimit;
            }
            let player = PlayerId::new(seat);
            self.turns_elapsed += 1;
            match self.run_turn(player) {
                Ok(Some(reason)) => break reason,
                Ok(None) => {}
                Err(KingdomError::Quit(p)) => break GameEndReason::Quit(p),
                Err(KingdomError::ProtocolViolation(msg)) => {
                    let p = self.addressed.unwrap_or(player);
                    self.game.logger.minimal(&format!(
                        "{} disconnected: {msg}",
                        self.game.player_name(p)
                    ));
                    break GameEndReason::Disconnected(p);
                }
                Err(e) => return Err(e),
            }
            seat = (seat + 1) % seats;
        };

        Ok(self.finish(end_reason))
    }

    /// Score the game and hand the report to every participant
    pub fn finish(&mut self, end_reason: GameEndReason) -> GameReport {
        let scores = score_players(self.game);
        let report = GameReport {
            winner: winner(&scores),
            scores,
            turns_played: self.turns_elapsed,
            end_reason,
        };
        self.game.logger.minimal(&format_report(self.game, &report));
        for controller in self.controllers.iter_mut() {
            controller.on_game_end(&report);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_catalog;
    use crate::game::ScriptedController;
    use std::sync::Arc;

    fn two_player_game() -> GameState {
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        let mut game = GameState::new(Arc::new(standard_catalog().unwrap()), &names, 3);
        game.logger.enable_capture();
        game
    }

    #[test]
    fn test_game_loop_creation() {
        let mut game = two_player_game();
        let mut alice = ScriptedController::new(PlayerId::new(0), vec![]);
        let mut bob = ScriptedController::new(PlayerId::new(1), vec![]);
        let game_loop = GameLoop::new(&mut game, vec![&mut alice, &mut bob]).with_max_turns(5);
        assert_eq!(game_loop.turns_elapsed(), 0);
        assert_eq!(game_loop.active(), PlayerId::new(0));
    }

    #[test]
    fn test_seat_mismatch_is_rejected() {
        let mut game = two_player_game();
        let mut alice = ScriptedController::new(PlayerId::new(0), vec![]);
        let mut game_loop = GameLoop::new(&mut game, vec![&mut alice]);
        assert!(matches!(
            game_loop.run_game(),
            Err(KingdomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_quit_ends_with_report() {
        let mut game = two_player_game();
        let estate = game.card_id("Estate").unwrap();
        game.players[1].manifest.add(estate);

        let mut alice = ScriptedController::new(PlayerId::new(0), vec![Command::Quit]);
        let mut bob = ScriptedController::new(PlayerId::new(1), vec![]);
        let report = {
            let mut game_loop = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
            game_loop.run_game().unwrap()
        };

        assert_eq!(report.end_reason, GameEndReason::Quit(PlayerId::new(0)));
        assert_eq!(report.winner, Some(PlayerId::new(1)));
        assert_eq!(bob.final_report(), Some(&report));
    }

    #[test]
    fn test_turn_limit() {
        let mut game = two_player_game();
        let script = vec![Command::Advance, Command::Advance];
        let mut alice = ScriptedController::new(PlayerId::new(0), script.clone());
        let mut bob = ScriptedController::new(PlayerId::new(1), script);
        let report = {
            let mut game_loop =
                GameLoop::new(&mut game, vec![&mut alice, &mut bob]).with_max_turns(2);
            game_loop.run_game().unwrap()
        };
        assert_eq!(report.end_reason, GameEndReason::TurnLimit);
        assert_eq!(report.turns_played, 2);
        assert_eq!(game.turn.turn_number, 2);
    }
}
