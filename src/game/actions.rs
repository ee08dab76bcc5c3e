//! Primitive game actions used by the turn engine and card effects
//!
//! Every pile movement that participants should hear about goes through one
//! of these methods so the matching event is broadcast exactly once.

use crate::core::{Card, CardId, PlayerId};
use crate::game::{GameEvent, GameLoop, Phase};
use crate::{KingdomError, Result};
use std::sync::Arc;

/// Where a gained card lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainDestination {
    Discard,
    Hand,
    DeckTop,
}

impl<'a> GameLoop<'a> {
    /// Draw up to `count` cards, reshuffling as needed. One `Draw` event
    /// carries the number actually drawn.
    pub fn draw(&mut self, player: PlayerId, count: usize) -> usize {
        let drawn = self.game.draw_cards(player, count);
        if drawn > 0 {
            self.report(GameEvent::Draw {
                player,
                count: drawn,
            });
        }
        drawn
    }

    /// "+N cards" for the active player
    pub fn add_cards(&mut self, count: usize) -> usize {
        let player = self.active();
        self.draw(player, count)
    }

    pub fn add_actions(&mut self, n: u32) {
        self.game.turn.actions += n;
    }

    pub fn add_buys(&mut self, n: u32) {
        self.game.turn.buys += n;
    }

    pub fn add_coins(&mut self, n: u32) {
        self.game.turn.coins += n;
    }

    /// Take `card` from the supply into `player`'s discard pile
    pub fn gain(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        self.gain_to(player, card, GainDestination::Discard)
    }

    /// Gain unless the pile is empty. Returns whether a card was gained.
    pub fn maybe_gain(&mut self, player: PlayerId, card: CardId) -> bool {
        self.game.supply.remaining(card) > 0 && self.gain(player, card).is_ok()
    }

    pub fn gain_to(&mut self, player: PlayerId, card: CardId, dest: GainDestination) -> Result<()> {
        self.game.supply.take(card)?;
        self.receive(player, card, dest);
        Ok(())
    }

    /// Take `card` out of the trash instead of the supply
    pub fn gain_from_trash(&mut self, player: PlayerId, card: CardId) -> bool {
        if !self.game.trash.remove(card) {
            return false;
        }
        self.receive(player, card, GainDestination::Discard);
        true
    }

    fn receive(&mut self, player: PlayerId, card: CardId, dest: GainDestination) {
        let p = self.game.player_mut(player);
        match dest {
            GainDestination::Discard => p.discard.add(card),
            GainDestination::Hand => p.hand.add(card),
            GainDestination::DeckTop => p.deck.put_on_top(card),
        }
        p.manifest.add(card);
        self.report(GameEvent::Gain { player, card });
    }

    /// Put a card the caller already removed from `player`'s piles into the
    /// trash
    pub fn trash_card(&mut self, player: PlayerId, card: CardId) {
        self.game.trash.add(card);
        self.game.player_mut(player).manifest.remove(card);
        self.report(GameEvent::Trash { player, card });
    }

    pub fn trash_cards(&mut self, player: PlayerId, cards: Vec<CardId>) {
        for card in cards {
            self.trash_card(player, card);
        }
    }

    /// Trash the resolving card from `player`'s played pile
    ///
    /// Works once per frame: a doubled effect's second run finds its card
    /// already gone and gets `false`, even when another copy of the same
    /// card is still in play.
    pub fn trash_self(&mut self, player: PlayerId) -> bool {
        match self.stack.take_self_trash() {
            Some(card) if self.game.player_mut(player).played.remove(card) => {
                self.trash_card(player, card);
                true
            }
            _ => false,
        }
    }

    pub fn discard_cards(&mut self, player: PlayerId, cards: Vec<CardId>) {
        if cards.is_empty() {
            return;
        }
        let count = cards.len();
        self.game.player_mut(player).discard.extend(cards);
        self.report(GameEvent::Discard { player, count });
    }

    /// Move the whole deck to the discard pile
    pub fn discard_deck(&mut self, player: PlayerId) {
        let p = self.game.player_mut(player);
        let deck = p.deck.take_all();
        let count = deck.len();
        p.discard.extend(deck);
        self.report(GameEvent::DiscardDeck { player, count });
    }

    pub fn discard_hand(&mut self, player: PlayerId) {
        let hand = self.game.player_mut(player).hand.take_all();
        self.discard_cards(player, hand);
    }

    /// Take the top card of the deck (reshuffling if needed) and reveal it.
    /// The caller decides where it goes.
    pub fn reveal_from_deck(&mut self, player: PlayerId) -> Option<CardId> {
        if !self.game.maybe_shuffle(player) {
            return None;
        }
        let card = self.game.player_mut(player).deck.draw_top()?;
        self.report(GameEvent::Reveal { player, card });
        Some(card)
    }

    pub fn reveal_hand(&mut self, player: PlayerId) {
        let hand = self.game.player(player).hand.to_vec();
        for card in hand {
            self.report(GameEvent::Reveal { player, card });
        }
    }

    /// Why `player` may not play `card` now, if anything
    pub fn can_play(&self, player: PlayerId, card: CardId) -> std::result::Result<(), String> {
        if !self.game.player(player).has_in_hand(card) {
            return Err("none in hand".to_string());
        }
        let def = self.game.card(card);
        let turn = &self.game.turn;
        if def.is_action() {
            if turn.phase != Phase::Action {
                return Err("wrong phase".to_string());
            }
            if turn.actions == 0 {
                return Err("out of actions".to_string());
            }
        } else if def.is_treasure() {
            if turn.phase != Phase::Buy {
                return Err("wrong phase".to_string());
            }
        } else {
            return Err("unplayable card".to_string());
        }
        Ok(())
    }

    /// Why the active player may not buy `card` now, if anything
    pub fn can_buy(&self, card: CardId) -> std::result::Result<(), String> {
        let turn = &self.game.turn;
        if turn.phase != Phase::Buy {
            return Err("wrong phase".to_string());
        }
        if turn.buys == 0 {
            return Err("no buys left".to_string());
        }
        let Some(pile) = self.game.supply.pile(card) else {
            return Err("not in supply".to_string());
        };
        if self.game.cost(card) > turn.coins {
            return Err("insufficient money".to_string());
        }
        if pile.remaining == 0 {
            return Err("supply exhausted".to_string());
        }
        Ok(())
    }

    /// Spend coins and a buy, then gain the card
    pub fn buy(&mut self, card: CardId) -> Result<()> {
        self.can_buy(card).map_err(KingdomError::InvalidAction)?;
        let player = self.active();
        self.report(GameEvent::Buy { player, card });
        let cost = self.game.cost(card);
        self.game.turn.coins -= cost;
        self.game.turn.buys -= 1;
        self.gain(player, card)
    }

    /// Play `card` from the active player's hand
    ///
    /// An action card uses up one action here, however many times its
    /// effects end up running.
    pub fn play(&mut self, card: CardId) -> Result<()> {
        let player = self.active();
        self.can_play(player, card)
            .map_err(KingdomError::InvalidAction)?;
        self.game.player_mut(player).hand.remove(card);
        if self.game.card(card).is_action() {
            self.game.turn.actions -= 1;
        }
        self.multi_play(player, card, 1)
    }

    /// Put `card` into play and run its effect chain `times` times
    ///
    /// The card must already be out of the hand. One frame spans every
    /// repetition and is popped even if an effect fails.
    pub fn multi_play(&mut self, player: PlayerId, card: CardId, times: usize) -> Result<()> {
        self.game.player_mut(player).played.add(card);

        let catalog = Arc::clone(&self.game.catalog);
        let def = catalog.card(card);
        if def.is_action() {
            self.game.turn.actions_played += 1;
        }
        if def.effects.is_empty() {
            self.report(GameEvent::Play { player, card });
            self.game
                .logger
                .diagnostic(&format!("{} is not implemented", def.name));
            return Ok(());
        }

        self.stack.push(card);
        let result = self.run_effects(player, def, times);
        self.stack.pop();
        result
    }

    fn run_effects(&mut self, player: PlayerId, def: &Card, times: usize) -> Result<()> {
        for _ in 0..times {
            self.report(GameEvent::Play {
                player,
                card: def.id,
            });
            for effect in &def.effects {
                effect(self)?;
            }
        }
        Ok(())
    }
}
