//! Card effects played through the turn engine with scripted participants

mod common;

use common::{arrange, id, ids, seat, setup};
use kingdom_forge::game::{Command, GameEvent, GameLoop, Phase, ScriptedController};
use similar_asserts::assert_eq;

#[test]
fn witch_curses_everyone_without_a_moat() {
    let mut game = setup(3, 1);
    arrange(&mut game, 0, &["Witch", "Copper", "Copper", "Copper", "Copper"], &["Estate", "Estate", "Silver"]);
    arrange(&mut game, 1, &["Moat", "Copper", "Copper", "Estate", "Estate"], &[]);
    arrange(&mut game, 2, &["Copper", "Copper", "Copper", "Copper", "Copper"], &[]);
    let witch = id(&game, "Witch");
    let moat = id(&game, "Moat");
    let curse = id(&game, "Curse");

    let mut alice = ScriptedController::new(seat(0), vec![]);
    let mut bob = ScriptedController::new(seat(1), vec![Command::Pick(moat)]);
    let mut carol = ScriptedController::new(seat(2), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob, &mut carol]);
        gl.play(witch).unwrap();
    }

    assert_eq!(game.players[0].hand.len(), 6);
    assert!(!game.players[1].manifest.contains(curse));
    assert!(game.players[1].hand.contains(moat));
    assert_eq!(game.players[2].discard.to_vec(), vec![curse]);
    assert_eq!(game.players[2].manifest.count(curse), 1);
    assert_eq!(game.supply.remaining(curse), 19);

    assert_eq!(bob.remaining(), 0);
    assert!(carol.requests().is_empty());
    assert!(alice.events().contains(&GameEvent::Reveal {
        player: seat(1),
        card: moat
    }));
}

#[test]
fn bureaucrat_tops_silver_and_victory_cards() {
    let mut game = setup(3, 2);
    arrange(&mut game, 0, &["Bureaucrat", "Copper", "Copper", "Copper", "Copper"], &["Copper"]);
    arrange(&mut game, 1, &["Estate", "Copper", "Estate", "Copper", "Copper"], &["Gold"]);
    arrange(&mut game, 2, &["Copper", "Copper", "Copper", "Copper", "Copper"], &[]);
    let bureaucrat = id(&game, "Bureaucrat");
    let silver = id(&game, "Silver");
    let estate = id(&game, "Estate");

    let mut alice = ScriptedController::new(seat(0), vec![]);
    let mut bob = ScriptedController::new(seat(1), vec![]);
    let mut carol = ScriptedController::new(seat(2), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob, &mut carol]);
        gl.play(bureaucrat).unwrap();
        // Both victory cards are the same, so Bob is never asked
        assert_eq!(gl.choice_count(), 0);
    }

    assert_eq!(game.players[0].deck.peek_top(), Some(silver));
    assert_eq!(game.supply.remaining(silver), 39);
    assert_eq!(game.players[1].deck.peek_top(), Some(estate));
    assert_eq!(game.players[1].hand.len(), 4);
    assert_eq!(game.players[2].hand.len(), 5);

    let carol_reveals = alice
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Reveal { player, .. } if *player == seat(2)))
        .count();
    assert_eq!(carol_reveals, 5);
}

#[test]
fn throne_room_feast_trashes_once_and_gains_twice() {
    let mut game = setup(2, 3);
    arrange(&mut game, 0, &["Throne Room", "Feast", "Copper", "Copper", "Copper"], &[]);
    let cards = ids(&game, &["Throne Room", "Feast", "Market", "Duchy"]);
    let (throne, feast, market, duchy) = (cards[0], cards[1], cards[2], cards[3]);

    let mut alice = ScriptedController::new(seat(0), vec![Command::Pick(market), Command::Pick(duchy)]);
    let mut bob = ScriptedController::new(seat(1), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(throne).unwrap();
        assert_eq!(gl.game.turn.actions, 0);
        assert!(gl.stack.is_empty());
    }

    assert_eq!(game.trash.to_vec(), vec![feast]);
    assert_eq!(game.players[0].played.to_vec(), vec![throne]);
    assert_eq!(game.players[0].discard.to_vec(), vec![market, duchy]);
    assert!(!game.players[0].manifest.contains(feast));

    // Both gains were asked on behalf of the Feast frame
    assert_eq!(alice.requests().len(), 2);
    assert!(alice.requests().iter().all(|r| r.card == Some(feast)));
    let feast_plays = alice
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Play { card, .. } if *card == feast))
        .count();
    assert_eq!(feast_plays, 2);
}

#[test]
fn coppersmith_boosts_copper_for_the_turn() {
    let mut game = setup(2, 4);
    arrange(&mut game, 0, &["Coppersmith", "Copper", "Copper", "Copper", "Estate"], &[]);
    let coppersmith = id(&game, "Coppersmith");
    let copper = id(&game, "Copper");

    let mut alice = ScriptedController::new(seat(0), vec![]);
    let mut bob = ScriptedController::new(seat(1), vec![]);
    let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
    gl.play(coppersmith).unwrap();
    gl.game.turn.phase = Phase::Buy;
    for _ in 0..3 {
        gl.play(copper).unwrap();
    }
    assert_eq!(gl.game.turn.coins, 6);

    gl.game.turn.start(seat(0));
    assert_eq!(gl.game.turn.copper_bonus, 0);
}

#[test]
fn militia_victim_chooses_the_discards() {
    let mut game = setup(2, 5);
    arrange(&mut game, 0, &["Militia", "Copper", "Copper", "Copper", "Copper"], &[]);
    arrange(&mut game, 1, &["Copper", "Copper", "Estate", "Estate", "Silver"], &[]);
    let cards = ids(&game, &["Militia", "Copper", "Estate", "Silver"]);
    let (militia, copper, estate, silver) = (cards[0], cards[1], cards[2], cards[3]);

    let mut alice = ScriptedController::new(seat(0), vec![]);
    let mut bob = ScriptedController::new(seat(1), vec![Command::Pick(estate), Command::Pick(estate)]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(militia).unwrap();
        assert_eq!(gl.game.turn.coins, 2);
    }

    assert_eq!(game.players[1].hand.to_vec(), vec![copper, copper, silver]);
    assert_eq!(game.players[1].discard.to_vec(), vec![estate, estate]);
    assert_eq!(bob.remaining(), 0);
}

#[test]
fn secret_chamber_reacts_then_the_attack_lands() {
    let mut game = setup(2, 6);
    arrange(&mut game, 0, &["Militia", "Copper", "Copper", "Copper", "Copper"], &[]);
    arrange(
        &mut game,
        1,
        &["Secret Chamber", "Copper", "Copper", "Estate", "Estate"],
        &["Gold", "Silver"],
    );
    let cards = ids(&game, &["Militia", "Secret Chamber", "Copper", "Estate", "Gold", "Silver"]);
    let (militia, chamber, copper, estate, gold, silver) = (cards[0], cards[1], cards[2], cards[3], cards[4], cards[5]);

    let mut alice = ScriptedController::new(seat(0), vec![]);
    let mut bob = ScriptedController::new(
        seat(1),
        vec![
            Command::Pick(chamber),
            Command::Pick(estate),
            Command::Pick(estate),
            Command::Pick(copper),
            Command::Pick(copper),
        ],
    );
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(militia).unwrap();
    }

    let bob_state = &game.players[1];
    assert_eq!(bob_state.hand.to_vec(), vec![chamber, gold, silver]);
    assert_eq!(bob_state.deck.to_vec(), vec![estate, estate]);
    assert_eq!(bob_state.discard.to_vec(), vec![copper, copper]);
    // Each reaction is offered once per attack
    assert_eq!(bob.requests().len(), 5);
}

#[test]
fn thief_steals_the_chosen_treasure() {
    let mut game = setup(2, 7);
    arrange(&mut game, 0, &["Thief", "Copper", "Copper", "Copper", "Copper"], &[]);
    arrange(&mut game, 1, &["Copper", "Copper", "Copper", "Copper", "Copper"], &["Silver", "Gold", "Estate"]);
    let cards = ids(&game, &["Thief", "Silver", "Gold", "Estate"]);
    let (thief, silver, gold, estate) = (cards[0], cards[1], cards[2], cards[3]);

    let mut alice = ScriptedController::new(seat(0), vec![Command::Pick(gold), Command::Yes]);
    let mut bob = ScriptedController::new(seat(1), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(thief).unwrap();
    }

    assert!(game.trash.is_empty());
    assert_eq!(game.players[0].discard.to_vec(), vec![gold]);
    assert!(game.players[0].manifest.contains(gold));
    assert!(!game.players[1].manifest.contains(gold));
    assert_eq!(game.players[1].discard.to_vec(), vec![silver]);
    assert_eq!(game.players[1].deck.to_vec(), vec![estate]);
}

#[test]
fn chapel_trashes_until_done() {
    let mut game = setup(2, 8);
    arrange(&mut game, 0, &["Chapel", "Estate", "Copper", "Estate", "Silver"], &[]);
    let cards = ids(&game, &["Chapel", "Estate", "Copper", "Silver"]);
    let (chapel, estate, copper, silver) = (cards[0], cards[1], cards[2], cards[3]);

    let mut alice = ScriptedController::new(
        seat(0),
        vec![Command::Pick(estate), Command::Pick(copper), Command::Done],
    );
    let mut bob = ScriptedController::new(seat(1), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(chapel).unwrap();
    }

    assert_eq!(game.trash.to_vec(), vec![estate, copper]);
    assert_eq!(game.players[0].hand.to_vec(), vec![estate, silver]);
    assert_eq!(game.players[0].manifest.len(), 3);
}

#[test]
fn doubled_mining_village_trashes_only_itself() {
    let mut game = setup(2, 9);
    arrange(
        &mut game,
        0,
        &["Mining Village", "Throne Room", "Mining Village", "Copper", "Copper"],
        &["Estate", "Estate", "Estate"],
    );
    let cards = ids(&game, &["Mining Village", "Throne Room"]);
    let (village, throne) = (cards[0], cards[1]);

    // Keep the first village, then trash the doubled one on its first run
    let mut alice = ScriptedController::new(seat(0), vec![Command::Done, Command::Yes]);
    let mut bob = ScriptedController::new(seat(1), vec![]);
    {
        let mut gl = GameLoop::new(&mut game, vec![&mut alice, &mut bob]);
        gl.play(village).unwrap();
        gl.play(throne).unwrap();
        assert_eq!(gl.game.turn.coins, 2);
        assert_eq!(gl.game.turn.actions, 5);
        assert!(gl.stack.is_empty());
    }

    assert_eq!(game.trash.to_vec(), vec![village]);
    let alice_state = &game.players[0];
    assert_eq!(alice_state.played.count(village), 1);
    assert!(alice_state.played.contains(throne));
    assert_eq!(alice_state.manifest.count(village), 1);
    // Two yes/no prompts: the kept village and the first doubled run
    assert_eq!(alice.requests().len(), 2);
    assert_eq!(alice.remaining(), 0);
}
