//! Soul Hunter headless runner
//!
//! Plays seeded demo runs with the autopilot and records each result, the
//! same way the windowed game does on every game over.
//!
//! Usage: soul-hunter [--seed N] [--runs N] [--frames N] [--tuning FILE] [--settings FILE]

use std::path::PathBuf;
use std::process::ExitCode;

use soul_hunter::audio::LogSink;
use soul_hunter::consts::FPS;
use soul_hunter::input::Command;
use soul_hunter::sim::{GameMode, TickInput};
use soul_hunter::{CsvRecordStore, Game, Settings, Tuning};

/// Ten minutes of play at the fixed tick rate
const DEFAULT_MAX_FRAMES: u64 = FPS as u64 * 600;

struct Args {
    seed: u64,
    runs: u32,
    max_frames: u64,
    tuning: Option<PathBuf>,
    settings: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        seed: 0x5EED,
        runs: 1,
        max_frames: DEFAULT_MAX_FRAMES,
        tuning: None,
        settings: PathBuf::from("settings.json"),
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--seed" => args.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
            "--runs" => args.runs = value()?.parse().map_err(|e| format!("--runs: {e}"))?,
            "--frames" => {
                args.max_frames = value()?.parse().map_err(|e| format!("--frames: {e}"))?
            }
            "--tuning" => args.tuning = Some(PathBuf::from(value()?)),
            "--settings" => args.settings = PathBuf::from(value()?),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(&args.settings)?;
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let store = CsvRecordStore::open(&settings.records_path)?;
    let mut game = Game::new(
        args.seed,
        tuning,
        settings,
        Box::new(store),
        Box::new(LogSink),
    )?;
    game.set_settings_path(args.settings.clone());

    let demo = TickInput {
        commands: Vec::new(),
        autopilot: true,
    };

    for run in 1..=args.runs {
        game.frame(&TickInput::command(Command::Start));
        let mut frames = 1;
        let mut unsaved = None;
        while game.mode() == GameMode::Playing && frames < args.max_frames {
            unsaved = unsaved.or(game.frame(&demo).record_error);
            frames += 1;
        }
        if game.mode() == GameMode::Playing {
            log::info!("Run {} hit the frame limit, ending it", run);
            game.state.game_over();
            unsaved = unsaved.or(game.frame(&TickInput::default()).record_error);
        }
        if let Some(e) = unsaved {
            log::warn!("Run {} was not recorded: {}", run, e);
        }

        let state = &game.state;
        log::info!(
            "Run {}: score {}, kills {}, coins {} after {:.1}s{}",
            run,
            state.score,
            state.kills,
            state.coins,
            state.time_ticks as f64 / f64::from(FPS),
            if state.new_high_score { " (new high score)" } else { "" }
        );
    }

    game.frame(&TickInput::command(Command::Quit));
    for (rank, record) in game.leaderboard()?.entries.iter().enumerate() {
        log::info!("#{:<2} {}", rank + 1, record);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Soul Hunter (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
