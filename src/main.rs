//! Kingdom Forge - Main Binary
//!
//! Console play, hosting and joining networked matches, bot tournaments

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kingdom_forge::{
    cards::standard_catalog,
    core::PlayerId,
    game::{
        spawn_participant, GameLoop, GameReport, HeuristicController, InteractiveController, OutputFormat,
        PlayerController, RandomController, VerbosityLevel,
    },
    loader::{presets, CardCatalog, GameConfig, GameInitializer},
    remote::{run_client, RemoteListener},
    tournament::{run_tourney, BotKind, TournamentConfig},
};
use std::sync::Arc;
use std::time::Instant;

/// Who sits in a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeatKind {
    /// Human player on this console
    Tui,
    /// Heuristic AI
    Heuristic,
    /// Makes random legal choices
    Random,
    /// Participant connecting over TCP (serve only)
    Remote,
}

/// A `NAME=KIND` seat assignment
#[derive(Debug, Clone)]
struct SeatArg {
    name: String,
    kind: SeatKind,
}

impl std::str::FromStr for SeatArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let Some((name, kind)) = s.split_once('=') else {
            return Err(format!("invalid seat '{s}' (expected NAME=KIND)"));
        };
        if name.is_empty() {
            return Err(format!("seat '{s}' has no name"));
        }
        let kind = <SeatKind as ValueEnum>::from_str(kind, true)
            .map_err(|_| format!("invalid seat kind '{kind}' (expected: tui, heuristic, random, remote)"))?;
        Ok(SeatArg {
            name: name.to_string(),
            kind,
        })
    }
}

/// Bot type for tournament seats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BotArg {
    Heuristic,
    Random,
}

impl From<BotArg> for BotKind {
    fn from(arg: BotArg) -> Self {
        match arg {
            BotArg::Heuristic => BotKind::Heuristic,
            BotArg::Random => BotKind::Random,
        }
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Options shared by `play` and `serve`
#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// Seat assignment, repeatable, in turn order (e.g. --seat Ann=tui --seat Bot=heuristic)
    #[arg(long = "seat", value_name = "NAME=KIND")]
    seats: Vec<SeatArg>,

    /// Preset kingdom (see `kingdom presets`)
    #[arg(long, default_value = "First Game")]
    preset: String,

    /// Comma-separated list of ten kingdom cards; overrides --preset
    #[arg(long, value_name = "CARDS")]
    kingdom: Option<String>,

    /// Set random seed for deterministic games
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, default_value = "normal", short = 'v')]
    verbosity: VerbosityArg,

    /// Stop the match after this many turns
    #[arg(long, default_value_t = 1000)]
    max_turns: u32,

    /// Run each bot on its own thread behind a mailbox
    #[arg(long)]
    threaded: bool,

    /// Print the game log as JSON lines
    #[arg(long)]
    json_log: bool,
}

#[derive(Parser)]
#[command(name = "kingdom")]
#[command(about = "Kingdom Forge - deck-building card game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match on this console
    Play(MatchArgs),

    /// Host a match with remote seats
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:7878")]
        listen: String,

        #[command(flatten)]
        game: MatchArgs,
    },

    /// Join a hosted match
    Join {
        /// Host address
        #[arg(long, default_value = "127.0.0.1:7878")]
        connect: String,

        /// Who answers for this seat
        #[arg(long = "as", value_enum, default_value = "tui")]
        kind: SeatKind,

        /// Seed for a random bot
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run many bot games in parallel and print statistics
    Tourney {
        /// Bot per seat, repeatable, in turn order
        #[arg(long = "seat", value_enum)]
        seats: Vec<BotArg>,

        /// Number of games to play
        #[arg(long, short = 'g')]
        games: Option<usize>,

        /// Play for this many seconds instead of a fixed count
        #[arg(long)]
        seconds: Option<u64>,

        #[arg(long, default_value = "First Game")]
        preset: String,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 1000)]
        max_turns: u32,
    },

    /// List the preset kingdoms
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(game) => run_match(game, None)?,
        Commands::Serve { listen, game } => run_match(game, Some(listen))?,
        Commands::Join { connect, kind, seed } => run_join(&connect, kind, seed)?,
        Commands::Tourney {
            seats,
            games,
            seconds,
            preset,
            seed,
            max_turns,
        } => {
            let seats = if seats.is_empty() {
                vec![BotKind::Heuristic, BotKind::Heuristic]
            } else {
                seats.into_iter().map(BotKind::from).collect()
            };
            let games = if games.is_none() && seconds.is_none() {
                Some(100)
            } else {
                games
            };
            let config = TournamentConfig {
                preset,
                seats,
                games,
                seconds,
                seed: seed.unwrap_or_else(rand::random),
                max_turns,
            };
            run_tournament(&config)?;
        }
        Commands::Presets => {
            for preset in presets() {
                println!("{}: {}", preset.name, preset.cards.join(", "));
            }
        }
    }

    Ok(())
}

fn catalog() -> Result<Arc<CardCatalog>> {
    Ok(Arc::new(standard_catalog().context("building the card catalog")?))
}

/// Wrap a bot in a mailbox proxy on its own thread; the join closure
/// reports whether the thread finished cleanly
fn spawn_bot<C>(bot: C, joins: &mut Vec<Box<dyn FnOnce() -> bool>>) -> Box<dyn PlayerController>
where
    C: PlayerController + Send + 'static,
{
    let (proxy, handle) = spawn_participant(bot);
    joins.push(Box::new(move || handle.join().is_ok()));
    Box::new(proxy)
}

fn run_match(args: MatchArgs, listen: Option<String>) -> Result<()> {
    let seats = if args.seats.is_empty() {
        vec![
            SeatArg {
                name: "You".to_string(),
                kind: SeatKind::Tui,
            },
            SeatArg {
                name: "Bot".to_string(),
                kind: SeatKind::Heuristic,
            },
        ]
    } else {
        args.seats
    };
    if listen.is_none() && seats.iter().any(|s| s.kind == SeatKind::Remote) {
        bail!("remote seats need `kingdom serve`");
    }

    let catalog = catalog()?;
    let verbosity = VerbosityLevel::from(args.verbosity);
    let seed = args.seed.unwrap_or_else(rand::random);
    let names: Vec<String> = seats.iter().map(|s| s.name.clone()).collect();
    let mut config = match &args.kingdom {
        Some(list) => GameConfig::new(
            names.clone(),
            list.split(',').map(|s| s.trim().to_string()).collect(),
            seed,
        ),
        None => GameConfig::from_preset(names.clone(), &args.preset, seed)?,
    };
    config.max_turns = args.max_turns;

    if verbosity >= VerbosityLevel::Normal && !args.json_log {
        println!("=== Kingdom Forge ===");
        println!("Seed: {seed}");
    }

    let format = if args.json_log {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut game = GameInitializer::new(Arc::clone(&catalog))
        .with_verbosity(verbosity)
        .with_output_format(format)
        .init_game(&config)
        .context("setting up the game")?;

    let listener = match &listen {
        Some(addr) => {
            let listener = RemoteListener::bind(addr).with_context(|| format!("binding {addr}"))?;
            println!("Listening on {}", listener.local_addr()?);
            Some(listener)
        }
        None => None,
    };

    let mut joins: Vec<Box<dyn FnOnce() -> bool>> = Vec::new();
    let report = {
        let mut controllers: Vec<Box<dyn PlayerController>> = Vec::with_capacity(seats.len());
        for (i, seat) in seats.iter().enumerate() {
            let id = PlayerId::new(i as u32);
            let controller: Box<dyn PlayerController> = match seat.kind {
                SeatKind::Tui => Box::new(InteractiveController::stdio(id, Arc::clone(&catalog))),
                SeatKind::Heuristic => {
                    let bot = HeuristicController::new(id, Arc::clone(&catalog));
                    if args.threaded {
                        spawn_bot(bot, &mut joins)
                    } else {
                        Box::new(bot)
                    }
                }
                SeatKind::Random => {
                    let bot = RandomController::with_seed(id, Arc::clone(&catalog), seed.wrapping_add(i as u64 + 1));
                    if args.threaded {
                        spawn_bot(bot, &mut joins)
                    } else {
                        Box::new(bot)
                    }
                }
                SeatKind::Remote => {
                    let Some(listener) = &listener else {
                        bail!("remote seats need `kingdom serve`");
                    };
                    println!("Waiting for {} ...", seat.name);
                    let remote = listener
                        .accept(id, &names, &catalog)
                        .with_context(|| format!("seating {}", seat.name))?;
                    println!("{} connected from {}", seat.name, remote.peer());
                    Box::new(remote)
                }
            };
            controllers.push(controller);
        }

        let seat_refs: Vec<&mut dyn PlayerController> = controllers
            .iter_mut()
            .map(|c| &mut **c as &mut dyn PlayerController)
            .collect();
        let mut game_loop = GameLoop::new(&mut game, seat_refs)
            .with_max_turns(config.max_turns)
            .with_verbosity(verbosity);
        game_loop.run_game().context("running the game")?
    };

    // Participants leave once the report reaches them
    for join in joins {
        if !join() {
            eprintln!("Warning: a bot thread panicked");
        }
    }
    if verbosity == VerbosityLevel::Silent {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &GameReport) {
    for score in &report.scores {
        println!("{}: {}", score.name, score.total);
    }
    match report.winner.and_then(|p| report.scores.iter().find(|s| s.player == p)) {
        Some(score) => println!("{} wins", score.name),
        None => println!("Tie"),
    }
}

fn run_join(addr: &str, kind: SeatKind, seed: Option<u64>) -> Result<()> {
    let catalog = catalog()?;
    let connected = |seat: PlayerId, players: &[String]| {
        let name = players.get(seat.index()).map(String::as_str).unwrap_or("?");
        println!("Seated as {name} ({} players)", players.len());
    };

    let report = match kind {
        SeatKind::Tui => run_client(addr, &catalog, |seat, players| {
            connected(seat, players);
            InteractiveController::stdio(seat, Arc::clone(&catalog))
        })?,
        SeatKind::Heuristic => {
            let report = run_client(addr, &catalog, |seat, players| {
                connected(seat, players);
                HeuristicController::new(seat, Arc::clone(&catalog))
            })?;
            print_report(&report);
            report
        }
        SeatKind::Random => {
            let seed = seed.unwrap_or_else(rand::random);
            let report = run_client(addr, &catalog, |seat, players| {
                connected(seat, players);
                RandomController::with_seed(seat, Arc::clone(&catalog), seed)
            })?;
            print_report(&report);
            report
        }
        SeatKind::Remote => bail!("`--as remote` makes no sense when joining"),
    };
    if report.turns_played == 0 {
        eprintln!("The match ended before it started ({:?})", report.end_reason);
    }
    Ok(())
}

fn run_tournament(config: &TournamentConfig) -> Result<()> {
    println!("=== Kingdom Forge - Tournament Mode ===\n");
    match (config.games, config.seconds) {
        (Some(g), _) => println!("Running {g} games of {}", config.preset),
        (None, Some(s)) => println!("Running for {s} seconds of {}", config.preset),
        (None, None) => {}
    }
    println!("Using tournament seed: {}", config.seed);
    println!("Seats: {:?}\n", config.seats);

    let start = Instant::now();
    let stats = run_tourney(catalog()?, config)?;
    let elapsed = start.elapsed().as_secs_f64();

    println!("\n=== Tournament Complete ===");
    println!("Total games played: {}", stats.games);
    println!("Elapsed time: {elapsed:.2}s");
    if elapsed > 0.0 {
        println!("Games per second: {:.2}\n", stats.games as f64 / elapsed);
    }
    print!("{}", stats.summary(&config.seats));
    Ok(())
}
