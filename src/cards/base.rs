//! The base set

use crate::core::{PlayerId, ReactionOutcome};
use crate::game::{GainDestination, GameLoop, PickOptions, SupplyOptions};
use crate::loader::CardSet;
use crate::Result;

const TABLE: &str = "
Copper,0,Treasure,$1
Silver,3,Treasure,$2
Gold,6,Treasure,$3
Estate,2,Victory,#1
Duchy,5,Victory,#3
Province,8,Victory,#6
Curse,0,Curse,#-1

Cellar,2,Action,+A1
Chapel,2,Action
Moat,2,Action-Reaction,+C2
Chancellor,3,Action,$2
Village,3,Action,+C1,+A2
Woodcutter,3,Action,+B1,$2
Workshop,3,Action
Bureaucrat,4,Action-Attack
Feast,4,Action
Gardens,4,Victory
Militia,4,Action-Attack,$2
Moneylender,4,Action
Remodel,4,Action
Smithy,4,Action,+C3
Spy,4,Action-Attack,+C1,+A1
Thief,4,Action-Attack
Throne Room,4,Action
Council Room,5,Action,+C4,+B1
Festival,5,Action,+A2,+B1,$2
Laboratory,5,Action,+C2,+A1
Library,5,Action
Market,5,Action,+C1,+A1,+B1,$1
Mine,5,Action
Witch,5,Action-Attack,+C2
Adventurer,6,Action
";

pub fn set() -> CardSet {
    CardSet::new("base", TABLE)
        .effect("Cellar", cellar)
        .effect("Chapel", |gl| {
            let p = gl.active();
            let picked = gl.pick_hand(p, PickOptions::up_to(4).prompt("trash up to 4 cards"))?;
            gl.trash_cards(p, picked);
            Ok(())
        })
        .effect("Chancellor", |gl| {
            let p = gl.active();
            if !gl.game.player(p).deck.is_empty()
                && gl.ask_yes_no(p, "put your deck into your discard pile?")?
            {
                gl.discard_deck(p);
            }
            Ok(())
        })
        .effect("Workshop", |gl| gl.pick_gain(4).map(|_| ()))
        .effect("Bureaucrat", bureaucrat)
        .effect("Feast", |gl| {
            let p = gl.active();
            gl.trash_self(p);
            gl.pick_gain(5).map(|_| ())
        })
        .effect("Militia", |gl| {
            gl.attack(|gl, other| {
                let excess = gl.game.player(other).hand.len().saturating_sub(3);
                if excess == 0 {
                    return Ok(());
                }
                let lost = gl.pick_hand(
                    other,
                    PickOptions::exactly(excess).prompt(format!("discard {excess} cards")),
                )?;
                gl.discard_cards(other, lost);
                Ok(())
            })
        })
        .effect("Moneylender", |gl| {
            let p = gl.active();
            let copper = gl.game.card_id("Copper")?;
            if gl.game.player_mut(p).hand.remove(copper) {
                gl.trash_card(p, copper);
                gl.add_coins(3);
            }
            Ok(())
        })
        .effect("Remodel", |gl| {
            let p = gl.active();
            let picked = gl.pick_hand(p, PickOptions::exactly(1).prompt("trash a card"))?;
            if let Some(&card) = picked.first() {
                gl.trash_card(p, card);
                let max = gl.game.cost(card) + 2;
                gl.gain_from_supply(p, SupplyOptions::costing_up_to(max), GainDestination::Discard)?;
            }
            Ok(())
        })
        .effect("Spy", |gl| {
            let p = gl.active();
            spy_on(gl, p, p)?;
            gl.attack(|gl, other| spy_on(gl, p, other))
        })
        .effect("Thief", thief)
        .effect("Throne Room", |gl| {
            let p = gl.active();
            let opts = PickOptions::exactly(1)
                .only(|c| c.is_action(), "must pick Action")
                .prompt("play an action twice");
            let picked = gl.pick_hand(p, opts)?;
            if let Some(&card) = picked.first() {
                gl.multi_play(p, card, 2)?;
            }
            Ok(())
        })
        .effect("Council Room", |gl| {
            gl.for_others(|gl, other| {
                gl.draw(other, 1);
                Ok(())
            })
        })
        .effect("Library", library)
        .effect("Mine", |gl| {
            let p = gl.active();
            let opts = PickOptions::exactly(1)
                .only(|c| c.is_treasure(), "must pick Treasure")
                .prompt("trash a treasure");
            let picked = gl.pick_hand(p, opts)?;
            if let Some(&card) = picked.first() {
                gl.trash_card(p, card);
                let gain = SupplyOptions::costing_up_to(gl.game.cost(card) + 3)
                    .only(|c| c.is_treasure(), "must pick Treasure");
                gl.gain_from_supply(p, gain, GainDestination::Hand)?;
            }
            Ok(())
        })
        .effect("Witch", |gl| {
            let curse = gl.game.card_id("Curse")?;
            gl.attack(|gl, other| {
                gl.maybe_gain(other, curse);
                Ok(())
            })
        })
        .effect("Adventurer", |gl| {
            let p = gl.active();
            let mut found = 0;
            let mut revealed = Vec::new();
            while found < 2 {
                let Some(card) = gl.reveal_from_deck(p) else {
                    break;
                };
                if gl.game.card(card).is_treasure() {
                    gl.game.player_mut(p).hand.add(card);
                    found += 1;
                } else {
                    revealed.push(card);
                }
            }
            gl.discard_cards(p, revealed);
            Ok(())
        })
        .reaction("Moat", |_, _| Ok(ReactionOutcome::Block))
        .victory("Gardens", |game, owner| {
            (game.player(owner).manifest.len() / 10) as i32
        })
}

fn cellar(gl: &mut GameLoop<'_>) -> Result<()> {
    let p = gl.active();
    let size = gl.game.player(p).hand.len();
    let picked = gl.pick_hand(p, PickOptions::up_to(size).prompt("discard any number of cards"))?;
    let n = picked.len();
    gl.discard_cards(p, picked);
    gl.draw(p, n);
    Ok(())
}

fn bureaucrat(gl: &mut GameLoop<'_>) -> Result<()> {
    let p = gl.active();
    let silver = gl.game.card_id("Silver")?;
    if gl.game.supply.remaining(silver) > 0 {
        gl.gain_to(p, silver, GainDestination::DeckTop)?;
    }
    gl.attack(|gl, other| {
        let opts = PickOptions::exactly(1)
            .only(|c| c.is_victory(), "must pick Victory card")
            .prompt("put a Victory card onto your deck");
        let picked = gl.pick_hand(other, opts)?;
        match picked.first() {
            Some(&card) => {
                gl.game.logger.normal(&format!(
                    "{} decks {}",
                    gl.game.player_name(other),
                    gl.game.card_name(card)
                ));
                gl.game.player_mut(other).deck.put_on_top(card);
            }
            None => gl.reveal_hand(other),
        }
        Ok(())
    })
}

/// Reveal `target`'s top card; `spy` decides whether it is discarded
fn spy_on(gl: &mut GameLoop<'_>, spy: PlayerId, target: PlayerId) -> Result<()> {
    let Some(card) = gl.reveal_from_deck(target) else {
        return Ok(());
    };
    let question = format!(
        "discard {}'s {}?",
        gl.game.player_name(target),
        gl.game.card_name(card)
    );
    if gl.ask_yes_no(spy, question)? {
        gl.discard_cards(target, vec![card]);
    } else {
        gl.game.player_mut(target).deck.put_on_top(card);
    }
    Ok(())
}

fn thief(gl: &mut GameLoop<'_>) -> Result<()> {
    let p = gl.active();
    gl.attack(|gl, other| {
        let mut loot = Vec::new();
        let mut junk = Vec::new();
        for _ in 0..2 {
            let Some(card) = gl.reveal_from_deck(other) else {
                break;
            };
            if gl.game.card(card).is_treasure() {
                loot.push(card);
            } else {
                junk.push(card);
            }
        }
        if loot.len() > 1 {
            let (picked, rest) =
                gl.split(loot, p, PickOptions::exactly(1).prompt("trash which treasure?"))?;
            junk.extend(rest);
            loot = picked;
        }
        if let Some(&card) = loot.first() {
            gl.trash_card(other, card);
            let question = format!("gain the trashed {}?", gl.game.card_name(card));
            if gl.ask_yes_no(p, question)? {
                gl.gain_from_trash(p, card);
            }
        }
        gl.discard_cards(other, junk);
        Ok(())
    })
}

fn library(gl: &mut GameLoop<'_>) -> Result<()> {
    let p = gl.active();
    let mut set_aside = Vec::new();
    while gl.game.player(p).hand.len() < 7 && gl.draw(p, 1) == 1 {
        let Some(card) = gl.game.player(p).hand.peek_last() else {
            break;
        };
        if !gl.game.card(card).is_action() {
            continue;
        }
        let question = format!("set aside {}?", gl.game.card_name(card));
        if gl.ask_yes_no(p, question)? {
            gl.game.player_mut(p).hand.remove(card);
            set_aside.push(card);
        }
    }
    gl.discard_cards(p, set_aside);
    Ok(())
}
