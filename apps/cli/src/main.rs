#![deny(warnings)]

//! Console advisor: reads the game data and the latest save, then prints
//! price, restocking and purchasing recommendations.

mod config;
mod render;
mod table;
mod watch;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use config::{parse_args, Config};
use shop_core::{GameData, SaveData};
use shop_report::StoreSnapshot;
use std::time::SystemTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use watch::{Changes, FileWatcher};

/// Clears the terminal before a reprint.
const CLEAR_SCREEN: &str = "\x1bc";

fn load_game_data(cfg: &Config) -> Result<GameData> {
    GameData::load(&cfg.game_data_path)
        .with_context(|| format!("loading game data {}", cfg.game_data_path.display()))
}

fn load_save(cfg: &Config) -> Result<SaveData> {
    SaveData::load(&cfg.save_path)
        .with_context(|| format!("loading save {}", cfg.save_path.display()))
}

fn report(game: &GameData, save: &SaveData, saved_at: Option<SystemTime>) -> Result<String> {
    let snapshot = StoreSnapshot::new(game, save).context("building store snapshot")?;
    let saved_at = saved_at.map(DateTime::<Local>::from);
    Ok(render::render(&snapshot, saved_at)?)
}

/// Reload whatever changed and reprint. A failed load keeps the previous data
/// and is retried on the next poll.
fn watch_loop(cfg: &Config) -> Result<()> {
    let mut watcher = FileWatcher::new(cfg);
    let mut game: Option<GameData> = None;
    let mut save: Option<SaveData> = None;
    loop {
        let changes = watcher.wait();
        let mut failed = Changes::default();
        if changes.game_data {
            match load_game_data(cfg) {
                Ok(g) => game = Some(g),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "keeping previous game data");
                    failed.game_data = true;
                }
            }
        }
        if changes.save {
            match load_save(cfg) {
                Ok(s) => save = Some(s),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "keeping previous save");
                    failed.save = true;
                }
            }
        }
        if failed.any() {
            watcher.retry(failed);
            continue;
        }
        let (Some(g), Some(s)) = (&game, &save) else {
            continue;
        };
        match report(g, s, watcher.save_time()) {
            Ok(text) => print!("{CLEAR_SCREEN}{text}"),
            Err(e) => warn!(error = %format!("{e:#}"), "report failed"),
        }
    }
}

fn main() -> Result<()> {
    // Logging goes to stderr so the report owns stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "{} {} ({}, {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    let cfg = Config::resolve(&args)?;
    info!(
        game_data = %cfg.game_data_path.display(),
        save = %cfg.save_path.display(),
        watch = cfg.watch,
        "starting advisor"
    );

    if cfg.watch {
        return watch_loop(&cfg);
    }
    let game = load_game_data(&cfg)?;
    let save = load_save(&cfg)?;
    let text = report(&game, &save, watch::modified(&cfg.save_path))?;
    print!("{text}");
    Ok(())
}
