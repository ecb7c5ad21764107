//! # Rouge Main Entry Point
//!
//! Headless runner: starts a new game (or loads a save), lets the autopilot play for a number of
//! turns, then prints a summary and optionally the final screen.

use clap::Parser;
use log::{error, info};
use rouge::{
    AsciiDisplay, Autopilot, FrameView, GameState, GameStatus, RougeError, RougeResult,
    TurnOutcome,
};
use std::path::PathBuf;

/// Command line arguments for Rouge.
#[derive(Parser, Debug)]
#[command(name = "rouge")]
#[command(about = "A turn-based dungeon crawler with procedural floors and boss levels")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of autopilot turns to play
    #[arg(short, long, default_value_t = 500)]
    turns: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the game to this file when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Resume from a saved game instead of starting a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Print the final screen
    #[arg(long)]
    show_map: bool,

    /// Colour the printed screen with ANSI escapes
    #[arg(long)]
    color: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logging(&args.log_level) {
        eprintln!("could not initialise logging: {}", e);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG` takes precedence when set.
fn initialize_logging(log_level: &str) -> RougeResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(log_level))
            .map_err(|e| RougeError::InvalidState(format!("bad log level: {}", e)))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| RougeError::InvalidState(e.to_string()))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let env = env_logger::Env::default().default_filter_or(log_level);
        env_logger::Builder::from_env(env)
            .format_target(false)
            .try_init()
            .map_err(|e| RougeError::InvalidState(e.to_string()))?;
    }

    Ok(())
}

fn run(args: &Args) -> RougeResult<()> {
    info!("Starting Rouge v{}", rouge::VERSION);

    let mut state = match &args.load {
        Some(path) => {
            info!("Loading game from {}", path.display());
            GameState::load_from_path(path)?
        }
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            info!("Generating a new game with seed {}", seed);
            GameState::new_game(seed)?
        }
    };

    #[cfg(feature = "dev-tools")]
    let _span = tracing::info_span!("game", seed = state.rng_seed).entered();

    let mut bot = Autopilot::new();
    let mut played = 0;
    while played < args.turns {
        let Some(action) = bot.next_action(&state) else {
            break;
        };
        match state.play_turn(action, &mut bot)? {
            TurnOutcome::GameOver => break,
            TurnOutcome::DidntTakeTurn => {
                // a refused action costs nothing, so pass the turn instead
                state.play_turn(rouge::PlayerAction::Wait, &mut bot)?;
            }
            TurnOutcome::TookTurn | TurnOutcome::Descended => {}
        }
        played += 1;
    }

    if args.show_map {
        let mut display = AsciiDisplay::new().with_color(args.color);
        println!("{}", display.render(&FrameView::capture(&state)));
        println!();
    }
    print_summary(&state);

    if let Some(path) = &args.save {
        if state.status == GameStatus::Dead {
            info!("Not saving a finished game");
        } else {
            state.save_to_path(path)?;
        }
    }
    Ok(())
}

fn print_summary(state: &GameState) {
    let stats = &state.statistics;
    let outcome = match state.status {
        GameStatus::Playing => "still alive",
        GameStatus::Dead => "dead",
    };
    println!("Seed {}: {} after {} turns", state.rng_seed, outcome, state.turn_number);
    if let Some(sheet) = state.character_sheet() {
        println!(
            "Depth {} (deepest {}), level {}, {}/{} hp, {} gold",
            sheet.depth,
            stats.max_depth_reached,
            sheet.level,
            sheet.hp,
            sheet.max_hp,
            sheet.gold
        );
    }
    println!(
        "Slain {}, items used {}, damage dealt {}, damage taken {}, steps {}",
        stats.monsters_slain,
        stats.items_used,
        stats.damage_dealt,
        stats.damage_taken,
        stats.steps_taken
    );
}
