//! Participants behind mailboxes and sockets play the same game as local ones

mod common;

use common::{catalog, names, seat};
use kingdom_forge::game::{spawn_participant, GameLoop, GameReport, HeuristicController, VerbosityLevel};
use kingdom_forge::loader::{CardCatalog, GameConfig, GameInitializer};
use kingdom_forge::remote::{run_client, RemoteListener};
use similar_asserts::assert_eq;
use std::sync::Arc;

fn local_game(catalog: &Arc<CardCatalog>, seed: u64) -> GameReport {
    let config = GameConfig::from_preset(names(2), "Interaction", seed).unwrap();
    let mut game = GameInitializer::new(Arc::clone(catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&config)
        .unwrap();
    let mut alice = HeuristicController::new(seat(0), Arc::clone(catalog));
    let mut bob = HeuristicController::new(seat(1), Arc::clone(catalog));
    GameLoop::new(&mut game, vec![&mut alice, &mut bob])
        .run_game()
        .unwrap()
}

#[test]
fn threaded_bots_match_local_bots() {
    let catalog = catalog();
    let expected = local_game(&catalog, 31);

    let config = GameConfig::from_preset(names(2), "Interaction", 31).unwrap();
    let mut game = GameInitializer::new(Arc::clone(&catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&config)
        .unwrap();
    let (mut alice, alice_thread) = spawn_participant(HeuristicController::new(seat(0), Arc::clone(&catalog)));
    let (mut bob, bob_thread) = spawn_participant(HeuristicController::new(seat(1), Arc::clone(&catalog)));
    let report = GameLoop::new(&mut game, vec![&mut alice, &mut bob])
        .run_game()
        .unwrap();

    assert_eq!(report, expected);
    alice_thread.join().unwrap();
    bob_thread.join().unwrap();
}

#[test]
fn remote_seat_over_tcp() {
    let catalog = catalog();
    let expected = local_game(&catalog, 32);

    let listener = RemoteListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let client_catalog = Arc::clone(&catalog);
    let client = std::thread::spawn(move || {
        let bot_catalog = Arc::clone(&client_catalog);
        run_client(&addr, &client_catalog, move |seat, players| {
            assert_eq!(players.len(), 2);
            HeuristicController::new(seat, bot_catalog)
        })
    });

    let config = GameConfig::from_preset(names(2), "Interaction", 32).unwrap();
    let mut game = GameInitializer::new(Arc::clone(&catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&config)
        .unwrap();
    let mut alice = HeuristicController::new(seat(0), Arc::clone(&catalog));
    let mut bob = listener.accept(seat(1), &config.players, &catalog).unwrap();
    let report = GameLoop::new(&mut game, vec![&mut alice, &mut bob])
        .run_game()
        .unwrap();
    drop(bob);

    assert_eq!(report, expected);
    let client_report = client.join().unwrap().unwrap();
    assert_eq!(client_report, report);
}

#[test]
fn vanished_client_ends_the_game_as_disconnected() {
    let catalog = catalog();
    let listener = RemoteListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    // Connects, then hangs up without reading anything
    let client = std::thread::spawn(move || {
        let stream = std::net::TcpStream::connect(addr).unwrap();
        drop(stream);
    });

    let config = GameConfig::from_preset(names(2), "First Game", 33).unwrap();
    let mut game = GameInitializer::new(Arc::clone(&catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&config)
        .unwrap();
    game.logger.enable_capture();
    let mut alice = kingdom_forge::game::ScriptedController::new(
        seat(0),
        vec![kingdom_forge::game::Command::Advance, kingdom_forge::game::Command::Advance],
    );
    let accepted = listener.accept(seat(1), &config.players, &catalog);
    client.join().unwrap();
    // The welcome may or may not have been written before the hang-up
    let Ok(mut bob) = accepted else {
        return;
    };
    let report = GameLoop::new(&mut game, vec![&mut alice, &mut bob])
        .run_game()
        .unwrap();
    assert_eq!(
        report.end_reason,
        kingdom_forge::game::GameEndReason::Disconnected(seat(1))
    );
}
