//! Scripted player controller for testing
//!
//! This controller answers every request with the next command of a
//! predetermined script, and records everything the engine tells it.

use crate::core::PlayerId;
use crate::game::controller::{Command, DecisionRequest, GameStateView, PlayerController};
use crate::game::{GameEvent, GameReport};
use crate::{KingdomError, Result};
use std::collections::VecDeque;

/// A controller that follows a predetermined sequence of commands
///
/// Running out of script is an error rather than a silent pass, so a test
/// that asks more questions than it expected fails loudly.
pub struct ScriptedController {
    player_id: PlayerId,
    script: VecDeque<Command>,
    requests: Vec<DecisionRequest>,
    events: Vec<GameEvent>,
    rejections: Vec<(Command, String)>,
    report: Option<GameReport>,
}

impl ScriptedController {
    /// Create a new scripted controller with a sequence of commands
    pub fn new(player_id: PlayerId, script: Vec<Command>) -> Self {
        ScriptedController {
            player_id,
            script: script.into(),
            requests: Vec::new(),
            events: Vec::new(),
            rejections: Vec::new(),
            report: None,
        }
    }

    /// Commands not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Every request this controller was asked, in order
    pub fn requests(&self) -> &[DecisionRequest] {
        &self.requests
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Rejected commands with their reasons
    pub fn rejections(&self) -> &[(Command, String)] {
        &self.rejections
    }

    pub fn final_report(&self) -> Option<&GameReport> {
        self.report.as_ref()
    }
}

impl PlayerController for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, _view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        self.requests.push(request.clone());
        self.script
            .pop_front()
            .ok_or(KingdomError::ScriptExhausted(self.player_id))
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }

    fn on_rejected(&mut self, command: &Command, reason: &str) {
        self.rejections.push((*command, reason.to_string()));
    }

    fn on_game_end(&mut self, report: &GameReport) {
        self.report = Some(report.clone());
    }
}
