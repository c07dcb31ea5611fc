//! Runtime configuration: defaults, optional YAML file, command-line flags.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

/// Game save directory relative to the user's home.
const GAME_DIR: &str = "AppData/LocalLow/Nokta Games/Supermarket Simulator";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub game_data_path: PathBuf,
    pub save_path: PathBuf,
    /// Keep running and reprint whenever a file changes.
    pub watch: bool,
    pub poll_interval_ms: u64,
    /// Wait after a change before reading, so the game finishes writing.
    pub settle_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var_os("USERPROFILE")
            .or_else(|| std::env::var_os("HOME"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let dir = home.join(GAME_DIR);
        Self {
            game_data_path: dir.join("game-data.dat"),
            save_path: dir.join("SaveFile.es3"),
            watch: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the config file if given, then flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(p) = &args.game_data {
            cfg.game_data_path = p.clone();
        }
        if let Some(p) = &args.save {
            cfg.save_path = p.clone();
        }
        cfg.watch |= args.watch;
        if let Some(ms) = args.interval_ms {
            cfg.poll_interval_ms = ms;
        }
        Ok(cfg)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Parsed command-line flags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub game_data: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub watch: bool,
    pub interval_ms: Option<u64>,
    pub version: bool,
}

pub fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => out.config = Some(value(&arg, it.next())?.into()),
            "--game-data" => out.game_data = Some(value(&arg, it.next())?.into()),
            "--save" => out.save = Some(value(&arg, it.next())?.into()),
            "--watch" => out.watch = true,
            "--interval-ms" => {
                let v = value(&arg, it.next())?;
                out.interval_ms = Some(
                    v.parse()
                        .with_context(|| format!("--interval-ms expects milliseconds, got {v:?}"))?,
                );
            }
            "--version" | "-V" => out.version = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(out)
}

fn value(flag: &str, next: Option<String>) -> Result<String> {
    match next {
        Some(v) => Ok(v),
        None => bail!("{flag} expects a value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags() {
        let a = args(&["--save", "s.es3", "--watch", "--interval-ms", "50"]).unwrap();
        assert_eq!(a.save, Some(PathBuf::from("s.es3")));
        assert!(a.watch);
        assert_eq!(a.interval_ms, Some(50));
        assert!(args(&["--interval-ms", "soon"]).is_err());
        assert!(args(&["--save"]).is_err());
        assert!(args(&["--bogus"]).is_err());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("save_path: /tmp/save.es3\nsettle_delay_ms: 250\n").unwrap();
        assert_eq!(cfg.save_path, PathBuf::from("/tmp/save.es3"));
        assert_eq!(cfg.settle_delay(), Duration::from_millis(250));
        assert_eq!(cfg.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert!(cfg.game_data_path.ends_with("game-data.dat"));
        assert!(Config::from_yaml("poll: 1\n").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let a = args(&["--game-data", "g.dat", "--interval-ms", "10"]).unwrap();
        let cfg = Config::resolve(&a).unwrap();
        assert_eq!(cfg.game_data_path, PathBuf::from("g.dat"));
        assert_eq!(cfg.poll_interval(), Duration::from_millis(10));
        assert!(!cfg.watch);
        assert!(cfg.save_path.ends_with("SaveFile.es3"));
    }
}
