// Logging setup.
// The terminal belongs to the UI, so tracing output goes to a file in the data directory.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::error::{LemonError, Result};

/// Install the global tracing subscriber, appending to `lemon.log`.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| LemonError::Other(format!("Invalid log filter: {e}")))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LemonError::Other(format!("Logger already installed: {e}")))?;

    Ok(())
}
