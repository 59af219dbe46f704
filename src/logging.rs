//! File logging.
//!
//! stdout carries the report or the dashboard, so tracing output goes to
//! `git-velocity.log` under the platform's local data directory
//! (`~/.local/share/git-velocity/` on Linux). `RUST_LOG` overrides the
//! default filter.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LogError;

/// Our own spans at `info`; dependencies such as reqwest and hyper only when they warn
pub const DEFAULT_FILTER: &str = "warn,git_velocity=info";

const LOG_DIR: &str = "git-velocity";
const LOG_FILE: &str = "git-velocity.log";

/// Log file location below `base`, creating the directory if needed
pub fn log_path_in(base: &Path) -> Result<PathBuf, LogError> {
    let dir = base.join(LOG_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(LOG_FILE))
}

fn open_log_file(path: &Path) -> Result<File, LogError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber and return the log file path.
///
/// Fails when there is no data directory, the file cannot be opened, or a
/// subscriber is already installed. Callers may carry on without logs.
pub fn init() -> Result<PathBuf, LogError> {
    let base = dirs::data_local_dir().ok_or(LogError::NoDataDir)?;
    let path = log_path_in(&base)?;
    let file = open_log_file(&path)?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .try_init()
        .map_err(|e| LogError::Subscriber(e.to_string()))?;

    tracing::info!(path = %path.display(), version = env!("CARGO_PKG_VERSION"), "Logging initialized");
    Ok(path)
}
