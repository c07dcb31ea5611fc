//! Modification-time polling of the game files.

use crate::config::Config;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Which files changed since the previous poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    pub game_data: bool,
    pub save: bool,
}

impl Changes {
    pub fn any(self) -> bool {
        self.game_data || self.save
    }
}

#[derive(Debug)]
struct Watched {
    path: PathBuf,
    seen: Option<SystemTime>,
    previous: Option<SystemTime>,
}

impl Watched {
    /// `Some(first_load)` when the file is newer than last seen.
    fn check(&mut self) -> Option<bool> {
        let mtime = modified(&self.path)?;
        match self.seen {
            Some(prev) if mtime <= prev => None,
            prev => {
                self.previous = prev;
                self.seen = Some(mtime);
                Some(prev.is_none())
            }
        }
    }

    fn rollback(&mut self) {
        self.seen = self.previous;
    }
}

#[derive(Debug)]
pub struct FileWatcher {
    game_data: Watched,
    save: Watched,
    poll_interval: Duration,
    settle_delay: Duration,
}

impl FileWatcher {
    pub fn new(cfg: &Config) -> Self {
        Self {
            game_data: Watched {
                path: cfg.game_data_path.clone(),
                seen: None,
                previous: None,
            },
            save: Watched {
                path: cfg.save_path.clone(),
                seen: None,
                previous: None,
            },
            poll_interval: cfg.poll_interval(),
            settle_delay: cfg.settle_delay(),
        }
    }

    /// Compare both files against their last seen modification time. Missing
    /// files never count as changed.
    pub fn poll(&mut self) -> Changes {
        let game = self.game_data.check();
        let save = self.save.check();
        // files seen before are likely still being written
        if game == Some(false) || save == Some(false) {
            sleep(self.settle_delay);
        }
        Changes {
            game_data: game.is_some(),
            save: save.is_some(),
        }
    }

    /// Block until at least one file changed.
    pub fn wait(&mut self) -> Changes {
        loop {
            let changes = self.poll();
            if changes.any() {
                debug!(?changes, "files changed");
                return changes;
            }
            sleep(self.poll_interval);
        }
    }

    /// Forget the latest change of every file flagged in `failed`, so the
    /// next poll reports it again. Used when a load found a half-written file.
    /// Waits one poll interval before returning.
    pub fn retry(&mut self, failed: Changes) {
        if failed.game_data {
            self.game_data.rollback();
        }
        if failed.save {
            self.save.rollback();
        }
        sleep(self.poll_interval);
    }

    /// Modification time of the save file as last seen.
    pub fn save_time(&self) -> Option<SystemTime> {
        self.save.seen
    }
}

/// Last modification time; `None` unless `path` is a regular file.
pub fn modified(path: &Path) -> Option<SystemTime> {
    let meta = std::fs::metadata(path).ok()?;
    if !meta.is_file() {
        return None;
    }
    meta.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(tag: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("shop-advisor-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Config {
            game_data_path: dir.join("game-data.dat"),
            save_path: dir.join("SaveFile.es3"),
            watch: true,
            poll_interval_ms: 1,
            settle_delay_ms: 0,
        }
    }

    #[test]
    fn first_poll_reports_existing_files_only() {
        let cfg = temp_config("first");
        std::fs::write(&cfg.save_path, "{}").unwrap();
        let _ = std::fs::remove_file(&cfg.game_data_path);
        let mut w = FileWatcher::new(&cfg);
        assert_eq!(
            w.poll(),
            Changes {
                game_data: false,
                save: true
            }
        );
        assert!(w.save_time().is_some());
        // unchanged since
        assert!(!w.poll().any());
    }

    #[test]
    fn retried_file_is_reported_again() {
        let cfg = temp_config("retry");
        std::fs::write(&cfg.save_path, "{}").unwrap();
        std::fs::write(&cfg.game_data_path, "{}").unwrap();
        let mut w = FileWatcher::new(&cfg);
        assert!(w.poll().save);

        w.retry(Changes {
            game_data: false,
            save: true,
        });
        assert_eq!(w.save_time(), None);
        assert_eq!(
            w.poll(),
            Changes {
                game_data: false,
                save: true
            }
        );
        assert!(!w.poll().any());
    }

    #[test]
    fn directories_are_not_files() {
        assert_eq!(modified(&std::env::temp_dir()), None);
    }
}
