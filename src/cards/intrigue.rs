//! Cards from the Intrigue expansion

use crate::core::{CardId, ReactionOutcome};
use crate::game::{GainDestination, GameLoop, PickOptions};
use crate::loader::CardSet;
use crate::Result;

const TABLE: &str = "
Courtyard,2,Action,+C3
Pawn,2,Action
Secret Chamber,2,Action-Reaction
Great Hall,3,Action-Victory,+C1,+A1,#1
Shanty Town,3,Action,+A2
Steward,3,Action
Baron,4,Action,+B1
Bridge,4,Action,+B1,$1
Conspirator,4,Action,$2
Coppersmith,4,Action
Ironworks,4,Action
Mining Village,4,Action,+C1,+A2
Scout,4,Action,+A1
Duke,5,Victory
Minion,5,Action-Attack,+A1
Torturer,5,Action-Attack,+C3
Harem,6,Treasure-Victory,$2,#2
Nobles,6,Action-Victory,#2
";

pub fn set() -> CardSet {
    CardSet::new("intrigue", TABLE)
        .effect("Courtyard", |gl| {
            let p = gl.active();
            let opts = PickOptions::exactly(1).prompt("put a card from your hand onto your deck");
            for card in gl.pick_hand(p, opts)? {
                gl.game.player_mut(p).deck.put_on_top(card);
            }
            Ok(())
        })
        .effect("Pawn", |gl| {
            let p = gl.active();
            let picks = gl.choose_menu(p, &["+1 Card", "+1 Action", "+1 Buy", "+$1"], 2)?;
            for pick in picks {
                match pick {
                    0 => {
                        gl.add_cards(1);
                    }
                    1 => gl.add_actions(1),
                    2 => gl.add_buys(1),
                    _ => gl.add_coins(1),
                }
            }
            Ok(())
        })
        .effect("Secret Chamber", |gl| {
            let p = gl.active();
            let size = gl.game.player(p).hand.len();
            let picked = gl.pick_hand(p, PickOptions::up_to(size).prompt("discard for +$1 each"))?;
            gl.add_coins(picked.len() as u32);
            gl.discard_cards(p, picked);
            Ok(())
        })
        .reaction("Secret Chamber", |gl, p| {
            gl.draw(p, 2);
            let opts = PickOptions::exactly(2).prompt("put 2 cards from your hand onto your deck");
            for card in gl.pick_hand(p, opts)? {
                gl.game.player_mut(p).deck.put_on_top(card);
            }
            Ok(ReactionOutcome::Continue)
        })
        .effect("Shanty Town", |gl| {
            let p = gl.active();
            gl.reveal_hand(p);
            if !gl.game.hand_has(p, |c| c.is_action()) {
                gl.add_cards(2);
            }
            Ok(())
        })
        .effect("Steward", |gl| {
            let p = gl.active();
            let picks = gl.choose_menu(p, &["+2 Cards", "+$2", "Trash 2 cards from your hand"], 1)?;
            match picks.first().copied() {
                Some(0) => {
                    gl.add_cards(2);
                }
                Some(1) => gl.add_coins(2),
                Some(_) => {
                    let trashed = gl.pick_hand(p, PickOptions::exactly(2).prompt("trash 2 cards"))?;
                    gl.trash_cards(p, trashed);
                }
                None => {}
            }
            Ok(())
        })
        .effect("Baron", |gl| {
            let p = gl.active();
            let estate = gl.game.card_id("Estate")?;
            let opts = PickOptions::up_to(1)
                .only(move |c| c.id == estate, "must pick Estate")
                .prompt("discard an Estate for +$4?");
            let picked = gl.pick_hand(p, opts)?;
            if picked.is_empty() {
                gl.maybe_gain(p, estate);
            } else {
                gl.add_coins(4);
                gl.discard_cards(p, picked);
            }
            Ok(())
        })
        .effect("Bridge", |gl| {
            gl.game.turn.discount += 1;
            Ok(())
        })
        .effect("Conspirator", |gl| {
            if gl.game.turn.actions_played >= 3 {
                gl.add_actions(1);
                gl.add_cards(1);
            }
            Ok(())
        })
        .effect("Coppersmith", |gl| {
            gl.game.turn.copper_bonus += 1;
            Ok(())
        })
        .effect("Copper", |gl| {
            let bonus = gl.game.turn.copper_bonus;
            gl.add_coins(bonus);
            Ok(())
        })
        .effect("Ironworks", |gl| {
            let Some(card) = gl.pick_gain(4)? else {
                return Ok(());
            };
            let (action, treasure, victory) = {
                let c = gl.game.card(card);
                (c.is_action(), c.is_treasure(), c.is_victory())
            };
            if action {
                gl.add_actions(1);
            }
            if treasure {
                gl.add_coins(1);
            }
            if victory {
                gl.add_cards(1);
            }
            Ok(())
        })
        .effect("Mining Village", |gl| {
            let p = gl.active();
            let in_play = gl.stack.top().is_some_and(|f| !f.trashed_self);
            if in_play && gl.ask_yes_no(p, "trash Mining Village for +$2?")? && gl.trash_self(p) {
                gl.add_coins(2);
            }
            Ok(())
        })
        .effect("Scout", scout)
        .effect("Minion", |gl| {
            let p = gl.active();
            let picks = gl.choose_menu(
                p,
                &["+$2", "discard your hand, +4 Cards; others with 5+ cards do the same"],
                1,
            )?;
            if picks.first() == Some(&0) {
                gl.add_coins(2);
                return Ok(());
            }
            gl.discard_hand(p);
            gl.draw(p, 4);
            gl.attack(|gl, other| {
                if gl.game.player(other).hand.len() >= 5 {
                    gl.discard_hand(other);
                    gl.draw(other, 4);
                }
                Ok(())
            })
        })
        .effect("Torturer", |gl| {
            let curse = gl.game.card_id("Curse")?;
            gl.attack(|gl, other| {
                let picks =
                    gl.choose_menu(other, &["discard 2 cards", "gain a Curse to your hand"], 1)?;
                if picks.first() == Some(&0) {
                    let lost = gl.pick_hand(other, PickOptions::exactly(2).prompt("discard 2 cards"))?;
                    gl.discard_cards(other, lost);
                } else if gl.game.supply.remaining(curse) > 0 {
                    gl.gain_to(other, curse, GainDestination::Hand)?;
                }
                Ok(())
            })
        })
        .effect("Nobles", |gl| {
            let p = gl.active();
            let picks = gl.choose_menu(p, &["+3 Cards", "+2 Actions"], 1)?;
            if picks.first() == Some(&0) {
                gl.add_cards(3);
            } else {
                gl.add_actions(2);
            }
            Ok(())
        })
        .victory("Duke", |game, owner| {
            let Ok(duchy) = game.card_id("Duchy") else {
                return 0;
            };
            game.player(owner).manifest.count(duchy) as i32
        })
}

fn scout(gl: &mut GameLoop<'_>) -> Result<()> {
    let p = gl.active();
    let mut rest: Vec<CardId> = Vec::new();
    for _ in 0..4 {
        let Some(card) = gl.reveal_from_deck(p) else {
            break;
        };
        if gl.game.card(card).is_victory() {
            gl.game.player_mut(p).hand.add(card);
        } else {
            rest.push(card);
        }
    }
    while !rest.is_empty() {
        let opts = PickOptions::exactly(1).prompt("put a card back on your deck; the last one ends on top");
        let (picked, others) = gl.split(rest, p, opts)?;
        for card in picked {
            gl.game.player_mut(p).deck.put_on_top(card);
        }
        rest = others;
    }
    Ok(())
}
