//! Attacks and reactions

use crate::core::{CardId, PlayerId, ReactionOutcome};
use crate::game::{GameEvent, GameLoop, PickOptions};
use crate::Result;

impl<'a> GameLoop<'a> {
    /// Run `hit` against every other player in seat order
    ///
    /// Each target first gets to reveal reactions; a blocking reaction
    /// skips that target. Targets are resolved one at a time.
    pub fn attack<F>(&mut self, mut hit: F) -> Result<()>
    where
        F: FnMut(&mut Self, PlayerId) -> Result<()>,
    {
        let attacker = self.active();
        for target in self.game.others(attacker) {
            self.game.logger.normal(&format!(
                "{} attacks {}",
                self.game.player_name(attacker),
                self.game.player_name(target)
            ));
            if self.resolve_reactions(target)? {
                self.game.logger.normal(&format!(
                    "{} is unaffected",
                    self.game.player_name(target)
                ));
                continue;
            }
            hit(self, target)?;
        }
        Ok(())
    }

    /// Run `f` for every other player in seat order, with no reactions
    pub fn for_others<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, PlayerId) -> Result<()>,
    {
        let active = self.active();
        for other in self.game.others(active) {
            f(self, other)?;
        }
        Ok(())
    }

    /// Offer `target` its reaction cards until it declines or none are left
    ///
    /// Each reaction card may be revealed once per attack. Returns true if
    /// a revealed reaction blocked the attack.
    pub fn resolve_reactions(&mut self, target: PlayerId) -> Result<bool> {
        let mut revealed: Vec<CardId> = Vec::new();
        loop {
            let hand = self.game.player(target).hand.to_vec();
            let offered = hand.iter().any(|&c| {
                self.game.card(c).is_reaction() && !revealed.contains(&c)
            });
            if !offered {
                return Ok(false);
            }

            let used = revealed.clone();
            let opts = PickOptions::up_to(1)
                .only(
                    move |card| card.is_reaction() && !used.contains(&card.id),
                    "must pick an unrevealed Reaction card",
                )
                .prompt("reveal a reaction?");
            let (picked, _) = self.split(hand, target, opts)?;
            let Some(&card) = picked.first() else {
                return Ok(false);
            };

            revealed.push(card);
            self.report(GameEvent::Reveal {
                player: target,
                card,
            });

            let Some(reaction) = self.game.card(card).reaction.clone() else {
                self.game.logger.diagnostic(&format!(
                    "{} has no reaction defined",
                    self.game.card_name(card)
                ));
                continue;
            };

            self.stack.push(card);
            let outcome = reaction(self, target);
            self.stack.pop();
            if outcome? == ReactionOutcome::Block {
                return Ok(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cards::standard_catalog;
    use crate::core::PlayerId;
    use crate::game::{Command, GameLoop, GameState, ScriptedController};
    use std::sync::Arc;

    fn game() -> GameState {
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut game = GameState::new(Arc::new(standard_catalog().unwrap()), &names, 9);
        game.logger.enable_capture();
        game
    }

    #[test]
    fn test_moat_blocks_only_its_holder() {
        let mut game = game();
        let moat = game.card_id("Moat").unwrap();
        let militia = game.card_id("Militia").unwrap();
        game.players[1].hand.add(moat);

        let mut a = ScriptedController::new(PlayerId::new(0), vec![]);
        let mut b = ScriptedController::new(PlayerId::new(1), vec![Command::Pick(moat)]);
        let mut c = ScriptedController::new(PlayerId::new(2), vec![]);
        let mut hit = Vec::new();
        {
            let mut gl = GameLoop::new(&mut game, vec![&mut a, &mut b, &mut c]);
            gl.stack.push(militia);
            gl.attack(|_, target| {
                hit.push(target);
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(hit, vec![PlayerId::new(2)]);
        // The Moat stays in hand
        assert!(game.players[1].hand.contains(moat));
    }

    #[test]
    fn test_declined_reaction_lets_attack_through() {
        let mut game = game();
        let moat = game.card_id("Moat").unwrap();
        let militia = game.card_id("Militia").unwrap();
        game.players[2].hand.add(moat);

        let mut a = ScriptedController::new(PlayerId::new(0), vec![]);
        let mut b = ScriptedController::new(PlayerId::new(1), vec![]);
        let mut c = ScriptedController::new(PlayerId::new(2), vec![Command::Done]);
        let mut hit = Vec::new();
        {
            let mut gl = GameLoop::new(&mut game, vec![&mut a, &mut b, &mut c]);
            gl.stack.push(militia);
            gl.attack(|_, target| {
                hit.push(target);
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(hit, vec![PlayerId::new(1), PlayerId::new(2)]);
    }
}
