//! Logging setup for panefm.
//!
//! The TUI owns stdout and stderr, so records go to a file under the cache
//! directory. `PANEFM_LOG` takes an `env_logger` filter (default `warn`).

use env_logger::{Builder, Env, Target};

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub const LOG_ENV: &str = "PANEFM_LOG";

/// `<cache dir>/panefm/panefm.log`
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("panefm").join("panefm.log"))
}

/// Installs the global logger. Must be called once, before the terminal is
/// put into raw mode. If the log file can't be opened logging is disabled.
pub fn init() {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, "warn"));
    builder.format_timestamp_millis();

    let file = log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder
                .target(Target::Stderr)
                .filter_level(log::LevelFilter::Off);
        }
    }

    // Only fails if a logger is already set, e.g. by a test harness.
    let _ = builder.try_init();
}
