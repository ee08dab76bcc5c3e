//! Player controller trait and the data it exchanges with the engine
//!
//! This module defines the interface between the turn engine and its
//! participants (console, scripted, bot, threaded or remote). The engine
//! asks exactly one controller at a time for a `Command`, handing it an
//! owned `GameStateView` and a `DecisionRequest` describing what is being
//! asked. Everything here is serializable so the same exchange can cross a
//! thread mailbox or a socket unchanged.

use crate::core::{CardId, PlayerId};
use crate::game::{GameEvent, GameReport, GameState, Phase};
use serde::{Deserialize, Serialize};

/// A decision value produced by a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "arg", rename_all = "snake_case")]
pub enum Command {
    /// Play a card from hand
    Play(CardId),
    /// Buy a card from the supply
    Buy(CardId),
    /// Move on to the next phase
    Advance,
    /// Select a card during a choice
    Pick(CardId),
    /// Finish (or decline) a choice; "no" to a yes/no question
    Done,
    /// "yes" to a yes/no question
    Yes,
    /// Select a numbered menu entry (0-based)
    Option(usize),
    /// End the match for everyone
    Quit,
}

/// The shape of the decision being requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionKind {
    /// A top-level command: play, buy or advance
    Turn { phase: Phase },
    /// Pick cards one at a time from `candidates`
    PickCards {
        /// Members not yet selected
        candidates: Vec<CardId>,
        /// The candidates that satisfy the eligibility rule
        eligible: Vec<CardId>,
        /// How many more may be picked
        remaining: usize,
        /// `Done` is refused until `remaining` reaches 0
        exact: bool,
    },
    /// Pick one card from the supply
    PickSupply { options: Vec<CardId>, allow_none: bool },
    /// `Yes` or `Done`
    YesNo,
    /// Pick numbered entries with `Option(i)`
    Menu {
        options: Vec<String>,
        remaining: usize,
        chosen: Vec<usize>,
    },
}

/// What the engine is asking for, and on whose behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The decision-holder
    pub player: PlayerId,
    pub kind: DecisionKind,
    /// Card whose effect is resolving, if any
    pub card: Option<CardId>,
    pub prompt: String,
}

impl DecisionRequest {
    pub fn is_turn(&self) -> bool {
        matches!(self.kind, DecisionKind::Turn { .. })
    }
}

/// One supply pile as a participant sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyEntry {
    pub card: CardId,
    pub key: char,
    /// Cost after this turn's discount
    pub cost: u32,
    pub remaining: u32,
}

/// Public pile sizes of one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub name: String,
    pub deck: usize,
    pub hand: usize,
    pub discard: usize,
    pub discard_top: Option<CardId>,
}

/// Snapshot of the game from one player's perspective
///
/// Owned rather than borrowed: the decision-holder may live on another
/// thread or across a socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    pub player: PlayerId,
    pub active: PlayerId,
    pub phase: Phase,
    pub actions: u32,
    pub buys: u32,
    pub coins: u32,
    pub turn_number: u32,
    /// The viewing player's own hand
    pub hand: Vec<CardId>,
    /// The viewing player's played pile
    pub played: Vec<CardId>,
    pub supply: Vec<SupplyEntry>,
    pub players: Vec<PlayerSummary>,
}

impl GameStateView {
    pub fn new(game: &GameState, player: PlayerId) -> Self {
        let me = game.player(player);
        GameStateView {
            player,
            active: game.turn.active,
            phase: game.turn.phase,
            actions: game.turn.actions,
            buys: game.turn.buys,
            coins: game.turn.coins,
            turn_number: game.turn.turn_number,
            hand: me.hand.to_vec(),
            played: me.played.to_vec(),
            supply: game
                .supply
                .iter()
                .map(|pile| SupplyEntry {
                    card: pile.card,
                    key: pile.key,
                    cost: game.cost(pile.card),
                    remaining: pile.remaining,
                })
                .collect(),
            players: game
                .players
                .iter()
                .map(|p| PlayerSummary {
                    player: p.id,
                    name: p.name.clone(),
                    deck: p.deck.len(),
                    hand: p.hand.len(),
                    discard: p.discard.len(),
                    discard_top: p.discard.peek_last(),
                })
                .collect(),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.player == self.active
    }

    pub fn supply_entry(&self, card: CardId) -> Option<&SupplyEntry> {
        self.supply.iter().find(|e| e.card == card)
    }

    pub fn card_by_key(&self, key: char) -> Option<CardId> {
        self.supply.iter().find(|e| e.key == key).map(|e| e.card)
    }

    pub fn key_of(&self, card: CardId) -> Option<char> {
        self.supply_entry(card).map(|e| e.key)
    }

    /// Affordable with the coins on hand, and not sold out
    pub fn can_afford(&self, card: CardId) -> bool {
        self.supply_entry(card)
            .is_some_and(|e| e.remaining > 0 && e.cost <= self.coins)
    }
}

/// Trait for participants
///
/// `next_command` is the only required decision point. The engine asks one
/// controller at a time and blocks until it answers; a rejected answer is
/// reported through `on_rejected` and the same request is asked again.
/// Notifications are advisory and never answered.
pub trait PlayerController {
    /// Get the player ID this controller is responsible for
    fn player_id(&self) -> PlayerId;

    /// Answer the pending decision
    fn next_command(
        &mut self,
        view: &GameStateView,
        request: &DecisionRequest,
    ) -> crate::Result<Command>;

    /// Called for every broadcast event (draws, gains, trashes, ...)
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called when an answer failed validation; the request will be repeated
    fn on_rejected(&mut self, _command: &Command, _reason: &str) {}

    /// Called once with the final report
    fn on_game_end(&mut self, _report: &GameReport) {}
}
