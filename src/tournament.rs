//! Tournament mode for running many bot games in parallel and collecting statistics
//!
//! Every game gets a seed derived from the tournament seed and its index,
//! so a tournament with the same seed and game count replays exactly.

use crate::{
    core::PlayerId,
    game::{GameEndReason, GameLoop, GameReport, HeuristicController, PlayerController, RandomController, VerbosityLevel},
    loader::{CardCatalog, GameConfig, GameInitializer},
    KingdomError, Result,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Controller type for tournament seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BotKind {
    Random,
    Heuristic,
}

/// What to play and for how long
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// Preset kingdom used by every game
    pub preset: String,
    /// One bot per seat, in seat order
    pub seats: Vec<BotKind>,
    pub games: Option<usize>,
    pub seconds: Option<u64>,
    pub seed: u64,
    pub max_turns: u32,
}

/// Statistics collected during a tournament
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentStats {
    pub games: usize,
    /// Wins indexed by seat
    pub seat_wins: Vec<usize>,
    pub ties: usize,
    pub total_turns: u64,
    pub end_reasons: BTreeMap<String, usize>,
    /// Games that aborted with an engine error
    pub failures: usize,
}

impl TournamentStats {
    fn for_seats(seats: usize) -> Self {
        TournamentStats {
            seat_wins: vec![0; seats],
            ..Default::default()
        }
    }

    fn record(&mut self, report: &GameReport) {
        self.games += 1;
        self.total_turns += u64::from(report.turns_played);
        match report.winner {
            Some(p) => {
                if let Some(wins) = self.seat_wins.get_mut(p.index()) {
                    *wins += 1;
                }
            }
            None => self.ties += 1,
        }
        *self.end_reasons.entry(reason_label(report.end_reason)).or_insert(0) += 1;
    }

    fn merge(mut self, other: TournamentStats) -> Self {
        self.games += other.games;
        self.ties += other.ties;
        self.total_turns += other.total_turns;
        self.failures += other.failures;
        if self.seat_wins.len() < other.seat_wins.len() {
            self.seat_wins.resize(other.seat_wins.len(), 0);
        }
        for (mine, theirs) in self.seat_wins.iter_mut().zip(other.seat_wins) {
            *mine += theirs;
        }
        for (reason, count) in other.end_reasons {
            *self.end_reasons.entry(reason).or_insert(0) += count;
        }
        self
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    /// Human-readable summary with one line per seat
    pub fn summary(&self, seats: &[BotKind]) -> String {
        let mut out = String::new();
        let total = self.games.max(1) as f64;
        let _ = writeln!(out, "=== Seat Statistics ===");
        for (i, wins) in self.seat_wins.iter().enumerate() {
            let kind = seats.get(i).map(|k| format!("{k:?}")).unwrap_or_default();
            let _ = writeln!(
                out,
                "Seat {} ({kind}): {wins} wins ({:.1}%)",
                i + 1,
                100.0 * *wins as f64 / total
            );
        }
        let _ = writeln!(out, "Ties: {} ({:.1}%)", self.ties, 100.0 * self.ties as f64 / total);
        let _ = writeln!(out, "Average turns: {:.1}", self.average_turns());
        let _ = writeln!(out, "\n=== End Reasons ===");
        for (reason, count) in &self.end_reasons {
            let _ = writeln!(out, "  {reason}: {count}");
        }
        if self.failures > 0 {
            let _ = writeln!(out, "Failed games: {}", self.failures);
        }
        out
    }
}

fn reason_label(reason: GameEndReason) -> String {
    match reason {
        GameEndReason::PrestigePileEmpty => "prestige pile empty".to_string(),
        GameEndReason::ThreePilesEmpty => "three piles empty".to_string(),
        GameEndReason::TurnLimit => "turn limit".to_string(),
        GameEndReason::Quit(_) => "quit".to_string(),
        GameEndReason::Disconnected(_) => "disconnected".to_string(),
    }
}

/// Seed for game `index` of a tournament seeded with `seed`
pub fn game_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one silent bot game
pub fn play_match(catalog: &Arc<CardCatalog>, config: &TournamentConfig, index: usize) -> Result<GameReport> {
    let seed = game_seed(config.seed, index);
    let names: Vec<String> = (1..=config.seats.len()).map(|i| format!("Bot {i}")).collect();
    let mut game_config = GameConfig::from_preset(names, &config.preset, seed)?;
    game_config.max_turns = config.max_turns;

    let mut game = GameInitializer::new(Arc::clone(catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game(&game_config)?;

    let mut controllers: Vec<Box<dyn PlayerController>> = config
        .seats
        .iter()
        .enumerate()
        .map(|(seat, kind)| {
            let id = PlayerId::new(seat as u32);
            let bot_seed = seed.wrapping_add(0x1234_5678_9ABC_DEF0_u64.wrapping_mul(seat as u64 + 1));
            let bot: Box<dyn PlayerController> = match kind {
                BotKind::Random => Box::new(RandomController::with_seed(id, Arc::clone(catalog), bot_seed)),
                BotKind::Heuristic => Box::new(HeuristicController::new(id, Arc::clone(catalog))),
            };
            bot
        })
        .collect();

    let seats: Vec<&mut dyn PlayerController> = controllers
        .iter_mut()
        .map(|c| &mut **c as &mut dyn PlayerController)
        .collect();
    let mut game_loop = GameLoop::new(&mut game, seats)
        .with_max_turns(game_config.max_turns)
        .with_verbosity(VerbosityLevel::Silent);
    game_loop.run_game()
}

/// Run tournament mode: play games in parallel until the game count or the
/// time limit is reached, printing progress every 100 games
pub fn run_tourney(catalog: Arc<CardCatalog>, config: &TournamentConfig) -> Result<TournamentStats> {
    if !(2..=4).contains(&config.seats.len()) {
        return Err(KingdomError::InvalidConfig(
            "a tournament needs 2 to 4 seats".to_string(),
        ));
    }
    let total_games = match (config.games, config.seconds) {
        (Some(g), _) => g,
        // Stops on time instead
        (None, Some(_)) => 1_000_000,
        (None, None) => {
            return Err(KingdomError::InvalidConfig(
                "specify a game count or a time limit".to_string(),
            ))
        }
    };
    // Fail fast on a bad preset instead of once per game
    crate::loader::find_preset(&config.preset)?;

    let deadline = config.seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let completed = AtomicUsize::new(0);
    let seats = config.seats.len();

    let stats = (0..total_games)
        .into_par_iter()
        .fold(
            || TournamentStats::for_seats(seats),
            |mut stats, index| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return stats;
                }
                match play_match(&catalog, config, index) {
                    Ok(report) => stats.record(&report),
                    Err(e) => {
                        eprintln!("Warning: game {index} failed: {e}");
                        stats.failures += 1;
                    }
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % 100 == 0 {
                    println!("Completed {done} games");
                }
                stats
            },
        )
        .reduce(|| TournamentStats::for_seats(seats), TournamentStats::merge);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_catalog;

    fn config(games: usize) -> TournamentConfig {
        TournamentConfig {
            preset: "First Game".to_string(),
            seats: vec![BotKind::Heuristic, BotKind::Random],
            games: Some(games),
            seconds: None,
            seed: 7,
            max_turns: 200,
        }
    }

    #[test]
    fn test_tournament_counts_every_game() {
        let catalog = Arc::new(standard_catalog().unwrap());
        let stats = run_tourney(catalog, &config(6)).unwrap();
        assert_eq!(stats.games + stats.failures, 6);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.seat_wins.iter().sum::<usize>() + stats.ties, 6);
        assert_eq!(stats.end_reasons.values().sum::<usize>(), 6);
        assert!(stats.average_turns() > 0.0);
    }

    #[test]
    fn test_matches_replay_from_seed() {
        let catalog = Arc::new(standard_catalog().unwrap());
        let cfg = config(1);
        let first = play_match(&catalog, &cfg, 3).unwrap();
        let second = play_match(&catalog, &cfg, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_bad_setup() {
        let catalog = Arc::new(standard_catalog().unwrap());
        let mut cfg = config(1);
        cfg.seats = vec![BotKind::Random];
        assert!(run_tourney(Arc::clone(&catalog), &cfg).is_err());

        let mut cfg = config(1);
        cfg.games = None;
        assert!(run_tourney(Arc::clone(&catalog), &cfg).is_err());

        let mut cfg = config(1);
        cfg.preset = "Nope".to_string();
        assert!(run_tourney(catalog, &cfg).is_err());
    }
}
