//! Fret Trainer - chord and note fingering drills in the terminal
//!
//! Single-player, tick-driven CLI front end over the `fret_trainer` core.
//! Plays the menu scene and the presentation/audio adapter: it picks the
//! mode, opens the preferences store and renders trainer events.

mod cli;

use clap::{Parser, Subcommand};
use cli::input::Command;
use cli::{Cursor, Display, InputHandler, Screen};
use fret_trainer::session::score::{format_best, format_seconds};
use fret_trainer::store::{JsonFileStore, Records};
use fret_trainer::tutorial::{Advance, GatePolicy};
use fret_trainer::{EventSink, Mode, Trainer, TrainerConfig, TrainerError, TutorialSession};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const PLAY_HELP: &str =
    "←↑↓→ move | SPACE press | ENTER strum | r restart | R reset best | q quit";
const TUTORIAL_HELP: &str = "←↑↓→ move | SPACE press | ENTER strum | n next | q quit";

#[derive(Parser, Debug)]
#[command(name = "Fret Trainer")]
#[command(about = "Chord and note fingering drills on a simulated fretboard")]
struct Args {
    /// Preferences file (selected mode and best times)
    #[arg(short, long, global = true, default_value = "fret_trainer_prefs.json")]
    store: PathBuf,

    /// JSON file replacing the built-in chord/note tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Play a mode's sequence against the clock
    Play {
        /// easy (chords) or hard (notes); defaults to the last mode played
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Practice the sequence in random order
        #[arg(long)]
        shuffle: bool,
    },
    /// Walk through the guided tutorial
    Tutorial {
        /// Let any strum open a gated step
        #[arg(long)]
        lenient: bool,
    },
    /// Forget the best time for a mode
    ResetBest {
        #[arg(short, long)]
        mode: Option<Mode>,
    },
    /// Print the chord and note tables
    Sheet {
        #[arg(short, long)]
        mode: Option<Mode>,
    },
}

/// Built-in tables unless `--config` names a file
fn load_config(args: &Args) -> Result<TrainerConfig, Box<dyn Error>> {
    let Some(path) = &args.config else {
        return Ok(TrainerConfig::default());
    };
    let config = TrainerConfig::load(path)?;
    if args.debug {
        println!(
            "✓ Config loaded: {} modes, {} tutorial steps",
            config.modes.len(),
            config.tutorial.len()
        );
    }
    Ok(config)
}

/// Open the preferences store; without one the trainer still runs
fn open_records(args: &Args, config: &TrainerConfig) -> Records {
    match JsonFileStore::open(&args.store) {
        Ok(store) => {
            if args.debug {
                println!("✓ Preferences: {}", store.path().display());
            }
            Records::new(Box::new(store), config.best_time_keying)
        }
        Err(e) => {
            if args.debug {
                eprintln!(
                    "⚠ Could not open {}: {} (records disabled)",
                    args.store.display(),
                    e
                );
            }
            warn!(error = %e, "preferences store unavailable");
            Records::detached(config.best_time_keying)
        }
    }
}

/// Mode from the flag, else the stored selection
fn resolve_mode(records: &mut Records, requested: Option<Mode>) -> Mode {
    match requested {
        Some(mode) => {
            if let Err(e) = records.select_mode(mode) {
                warn!(error = %e, "mode selection not persisted");
            }
            mode
        }
        None => records.selected_mode().unwrap_or_else(|e| {
            warn!(error = %e, "no stored mode");
            Mode::default()
        }),
    }
}

fn play(
    mut config: TrainerConfig,
    mut records: Records,
    mode: Option<Mode>,
    shuffle: bool,
) -> Result<(), Box<dyn Error>> {
    let mode = resolve_mode(&mut records, mode);
    config.shuffle |= shuffle;

    let (sink, events) = EventSink::channel();
    let mut trainer = Trainer::new(&config, mode, records, sink)?;

    let display = Display::simple()?;
    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();
    let mut screen = Screen::new();
    let mut cursor = Cursor::default();
    let mut last_frame = Instant::now();

    'session: loop {
        for event in events.try_iter() {
            screen.apply(&event);
        }
        display.draw(&screen, cursor, PLAY_HELP)?;

        if let Some(key) = input.read_key()? {
            match InputHandler::command(&key) {
                Some(Command::Quit) => break 'session,
                Some(Command::Move(direction)) => cursor.step(direction),
                Some(Command::Toggle) => {
                    trainer.toggle(cursor.control())?;
                }
                Some(Command::Strum) => match trainer.strum() {
                    Ok(_) | Err(TrainerError::SessionComplete) => {}
                    Err(e) => return Err(e.into()),
                },
                Some(Command::Restart) => trainer.restart()?,
                Some(Command::ResetBest) => trainer.reset_best_time(),
                Some(Command::Next) | None => {}
            }
        }

        let now = Instant::now();
        trainer.tick(now.duration_since(last_frame).as_secs_f32());
        last_frame = now;
    }

    InputHandler::disable_raw_mode()?;
    display.shutdown()?;
    drop(display);

    // Summary
    let summary = trainer.summary();
    let status = if summary.complete { "complete!" } else { "stopped" };
    println!("\n🎸 {} session {}", summary.mode, status);
    println!(
        "📊 Strums: {} | Correct: {} | Accuracy: {:.0}% | Best streak: {}",
        summary.attempts,
        summary.correct,
        summary.accuracy * 100.0,
        summary.best_streak
    );
    if summary.complete {
        println!(
            "⏱  Time: {} | Best: {}",
            format_seconds(summary.elapsed),
            format_best(summary.best)
        );
    }
    for (name, misses) in &summary.trouble {
        let hint = trainer
            .mistakes()
            .most_missing(name)
            .map(|(id, _)| format!(" (often missing control {})", id))
            .unwrap_or_default();
        println!("⚠️  {} missed {} times{}", name, misses, hint);
    }

    if let Err(e) = trainer.into_records().close() {
        warn!(error = %e, "preferences not saved on exit");
    }
    Ok(())
}

fn tutorial(config: TrainerConfig, records: Records, lenient: bool) -> Result<(), Box<dyn Error>> {
    let catalog = config.catalog()?;
    let policy = if lenient {
        GatePolicy::Lenient
    } else {
        config.tutorial_policy
    };

    let (sink, events) = EventSink::channel();
    let mut session = TutorialSession::with_policy(&config, &catalog, policy, sink)?;

    let display = Display::simple()?;
    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();
    let mut screen = Screen::new();
    let mut cursor = Cursor::default();

    'tutorial: loop {
        for event in events.try_iter() {
            screen.apply(&event);
        }
        display.draw(&screen, cursor, TUTORIAL_HELP)?;

        let Some(key) = input.read_key()? else {
            continue;
        };
        match InputHandler::command(&key) {
            Some(Command::Quit) => break 'tutorial,
            Some(Command::Move(direction)) => cursor.step(direction),
            Some(Command::Toggle) if !session.is_finished() => {
                session.toggle(cursor.control())?;
            }
            Some(Command::Strum) => {
                session.strum();
            }
            Some(Command::Next) => match session.next() {
                Ok(Advance::Step(_)) | Ok(Advance::Finished) | Err(TrainerError::Blocked) => {}
                Err(TrainerError::TutorialComplete) => break 'tutorial,
                Err(e) => return Err(e.into()),
            },
            _ => {}
        }
    }

    InputHandler::disable_raw_mode()?;
    display.shutdown()?;
    drop(display);

    if session.is_finished() {
        println!("\n🎸 Tutorial complete! Run `fret-trainer play` to start playing.");
    }
    if let Err(e) = records.close() {
        warn!(error = %e, "preferences not saved on exit");
    }
    Ok(())
}

fn reset_best(mut records: Records, mode: Option<Mode>) -> Result<(), Box<dyn Error>> {
    let mode = match mode {
        Some(mode) => mode,
        None => records.selected_mode()?,
    };
    records.reset_best_time(mode)?;
    records.close()?;
    println!("✓ Best time for {} cleared", mode);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = Args::parse();
    let config = load_config(&args)?;

    match args.action.take() {
        Some(Action::Sheet { mode }) => {
            let catalog = config.catalog()?;
            let modes: Vec<Mode> = match mode {
                Some(mode) => vec![mode],
                None => catalog.modes().collect(),
            };
            cli::display::print_cheat_sheet(&catalog, &modes);
            Ok(())
        }
        Some(Action::ResetBest { mode }) => reset_best(open_records(&args, &config), mode),
        Some(Action::Tutorial { lenient }) => {
            let records = open_records(&args, &config);
            tutorial(config, records, lenient)
        }
        Some(Action::Play { mode, shuffle }) => {
            let records = open_records(&args, &config);
            play(config, records, mode, shuffle)
        }
        None => {
            let records = open_records(&args, &config);
            play(config, records, None, false)
        }
    }
}
