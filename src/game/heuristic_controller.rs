//! Heuristic AI controller
//!
//! A money-first strategy: play actions (villages before everything
//! else), play every treasure, then buy the best card the coins allow.
//! Sub-decisions are answered with simple card valuations: junk goes
//! first when something must be trashed or discarded, the best card is
//! chosen when something gets played again.

use crate::core::{Card, CardId, PlayerId};
use crate::game::controller::{Command, DecisionKind, DecisionRequest, GameStateView, PlayerController};
use crate::game::{GameEvent, Phase};
use crate::loader::CardCatalog;
use crate::Result;
use std::sync::Arc;

/// Cards whose choices pick the best candidate instead of the worst
const BOOSTERS: &[&str] = &["Throne Room"];

/// Action cards worth owning one or two copies of
const WANTED_ACTIONS: &[&str] = &["Smithy", "Witch", "Laboratory", "Market", "Militia", "Moat"];

/// Heuristic AI controller that makes decisions using card valuations
/// rather than simulation.
pub struct HeuristicController {
    player_id: PlayerId,
    catalog: Arc<CardCatalog>,
    /// Action cards gained so far
    actions_owned: usize,
    /// The last answer was rejected; fall back to a safe answer once
    rejected: bool,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId, catalog: Arc<CardCatalog>) -> Self {
        HeuristicController {
            player_id,
            catalog,
            actions_owned: 0,
            rejected: false,
        }
    }

    fn card(&self, id: CardId) -> &Card {
        self.catalog.card(id)
    }

    /// How much this player wants to keep a card
    fn value(&self, id: CardId) -> i32 {
        let card = self.card(id);
        if card.is_curse() {
            -10
        } else if card.is_victory() && !card.is_action() && !card.is_treasure() {
            -5
        } else if card.is_action() {
            card.cost as i32 * 2 + 1
        } else {
            card.cost as i32 * 2
        }
    }

    /// Cards a player is better off without
    fn is_junk(&self, id: CardId) -> bool {
        self.value(id) < 0
    }

    fn turn_command(&self, view: &GameStateView) -> Command {
        match view.phase {
            Phase::Action => self.action_phase(view),
            Phase::Buy => self.buy_phase(view),
            Phase::Cleanup => Command::Advance,
        }
    }

    fn action_phase(&self, view: &GameStateView) -> Command {
        if view.actions == 0 {
            return Command::Advance;
        }
        let villages = view.hand.iter().copied().filter(|&c| {
            let card = self.card(c);
            card.is_action() && card.name.contains("Village")
        });
        let best = view
            .hand
            .iter()
            .copied()
            .filter(|&c| self.card(c).is_action())
            .max_by_key(|&c| self.value(c));
        match villages.max_by_key(|&c| self.value(c)).or(best) {
            Some(card) => Command::Play(card),
            None => Command::Advance,
        }
    }

    fn buy_phase(&self, view: &GameStateView) -> Command {
        if let Some(&treasure) = view.hand.iter().find(|&&c| self.card(c).is_treasure()) {
            return Command::Play(treasure);
        }
        if view.buys == 0 {
            return Command::Advance;
        }
        match self.pick_purchase(view) {
            Some(card) => Command::Buy(card),
            None => Command::Advance,
        }
    }

    fn pick_purchase(&self, view: &GameStateView) -> Option<CardId> {
        let named = |name: &str| {
            self.catalog
                .by_name(name)
                .filter(|&c| view.can_afford(c))
        };
        let late = view
            .supply
            .iter()
            .find(|e| self.card(e.card).name == "Province")
            .is_some_and(|e| e.remaining <= 4);

        if let Some(c) = named("Province") {
            return Some(c);
        }
        if late {
            if let Some(c) = named("Duchy") {
                return Some(c);
            }
        }
        if let Some(c) = named("Gold") {
            return Some(c);
        }
        if self.actions_owned < 2 {
            let action = WANTED_ACTIONS
                .iter()
                .filter_map(|n| named(n))
                .max_by_key(|&c| self.card(c).cost);
            if action.is_some() {
                return action;
            }
        }
        if late {
            if let Some(c) = named("Estate") {
                if view.coins < 3 {
                    return Some(c);
                }
            }
        }
        named("Silver")
    }

    fn pick_cards(
        &self,
        request: &DecisionRequest,
        eligible: &[CardId],
        exact: bool,
    ) -> Command {
        let boosting = request
            .card
            .is_some_and(|c| BOOSTERS.contains(&self.card(c).name.as_str()));
        let reacting = eligible.iter().all(|&c| self.card(c).is_reaction());

        if boosting || (reacting && !exact) {
            return match eligible.iter().copied().max_by_key(|&c| self.value(c)) {
                Some(c) => Command::Pick(c),
                None => Command::Done,
            };
        }
        let worst = eligible.iter().copied().min_by_key(|&c| self.value(c));
        match worst {
            Some(c) if exact || self.is_junk(c) => Command::Pick(c),
            _ => Command::Done,
        }
    }

    fn decide(&self, view: &GameStateView, request: &DecisionRequest) -> Command {
        match &request.kind {
            DecisionKind::Turn { .. } => self.turn_command(view),
            DecisionKind::PickCards { eligible, exact, .. } => {
                self.pick_cards(request, eligible, *exact)
            }
            DecisionKind::PickSupply { options, .. } => {
                let best = options
                    .iter()
                    .copied()
                    .filter(|&c| !self.card(c).is_curse())
                    .max_by_key(|&c| (self.card(c).cost, self.value(c)));
                match best.or_else(|| options.first().copied()) {
                    Some(c) => Command::Pick(c),
                    None => Command::Done,
                }
            }
            DecisionKind::YesNo => Command::Yes,
            DecisionKind::Menu { options, chosen, .. } => {
                let next = (0..options.len()).find(|i| !chosen.contains(i)).unwrap_or(0);
                Command::Option(next)
            }
        }
    }

    /// An answer the engine accepts whatever the situation
    fn fallback(&self, request: &DecisionRequest) -> Command {
        match &request.kind {
            DecisionKind::Turn { .. } => Command::Advance,
            DecisionKind::PickCards {
                eligible, exact, ..
            } => match eligible.first() {
                Some(&c) if *exact => Command::Pick(c),
                _ => Command::Done,
            },
            DecisionKind::PickSupply {
                options,
                allow_none,
            } => match options.first() {
                Some(&c) if !allow_none => Command::Pick(c),
                _ => Command::Done,
            },
            DecisionKind::YesNo => Command::Done,
            DecisionKind::Menu { options, chosen, .. } => {
                Command::Option((0..options.len()).find(|i| !chosen.contains(i)).unwrap_or(0))
            }
        }
    }
}

impl PlayerController for HeuristicController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        if std::mem::take(&mut self.rejected) {
            return Ok(self.fallback(request));
        }
        Ok(self.decide(view, request))
    }

    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Gain { player, card } = event {
            if *player == self.player_id && self.card(*card).is_action() {
                self.actions_owned += 1;
            }
        }
    }

    fn on_rejected(&mut self, _command: &Command, _reason: &str) {
        self.rejected = true;
    }
}
