use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

/// Where log lines go: `logging.file` when set, otherwise the XDG state
/// directory. `None` means logging is off. The terminal is never a target,
/// since the player draws over it in raw mode.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(config::default_log_path)
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// configured filter.
pub fn init(settings: &LoggingSettings) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(Some(path))
}

fn open_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
