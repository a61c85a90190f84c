//! Process-wide logging setup
//!
//! By default each run logs to its own timestamped file in the log
//! directory; console mode logs to stderr instead.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Initialize the global logger.
///
/// `log_dir` of `Some` writes to a per-run timestamped file inside that
/// directory (created if missing) and returns the file's path; `None`
/// logs to stderr. Must be called at most once per process.
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tgscraper=info"));

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Local::now()));
            let file = File::create(&path)?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();

            Ok(Some(path))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            Ok(None)
        }
    }
}

/// Per-run log file name, e.g. `tgs_2024-05-01_12-30-05.log`.
fn log_file_name(now: DateTime<Local>) -> String {
    format!("tgs_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}
