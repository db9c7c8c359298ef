// Application configuration.
// Reads overrides from the environment and falls back to the public Little Lemon feed.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::info;

use crate::cache::paths;
use crate::error::{LemonError, Result};

pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    /// Remote menu feed (JSON with a `menu` array).
    pub feed_url: String,
    /// Base URL that bare image filenames resolve against.
    pub image_base_url: String,
    /// Quiet period before a search/category change is applied.
    pub debounce: Duration,
    /// Directory holding the database, preferences, and log file.
    pub data_dir: PathBuf,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = match var("LEMON_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => paths::default_data_dir()
                .ok_or_else(|| LemonError::Other("No home directory for app data".into()))?,
        };

        Ok(Self {
            feed_url: var_or("LEMON_FEED_URL", DEFAULT_FEED_URL),
            image_base_url: var_or("LEMON_IMAGE_BASE_URL", DEFAULT_IMAGE_BASE_URL),
            debounce: Duration::from_millis(parse_or(
                "LEMON_DEBOUNCE_MS",
                var("LEMON_DEBOUNCE_MS"),
                DEFAULT_DEBOUNCE_MS,
            )?),
            data_dir,
            log_filter: var_or("LEMON_LOG", DEFAULT_LOG_FILTER),
        })
    }

    /// Record the resolved settings. Runs once logging is installed.
    pub fn log_resolved(&self) {
        info!(
            feed_url = %self.feed_url,
            feed_default = self.feed_url == DEFAULT_FEED_URL,
            image_base_url = %self.image_base_url,
            debounce_ms = self.debounce.as_millis() as u64,
            data_dir = %self.data_dir.display(),
            log_filter = %self.log_filter,
            "Configuration loaded"
        );
    }

    pub fn database_path(&self) -> PathBuf {
        paths::database_path(&self.data_dir)
    }

    pub fn preferences_path(&self) -> PathBuf {
        paths::preferences_path(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        paths::log_path(&self.data_dir)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| LemonError::Other(format!("Invalid {key} value {raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_parse_or_default() {
        let value: u64 = parse_or("LEMON_DEBOUNCE_MS", None, 500).unwrap();
        assert_eq!(value, 500);
    }

    #[test]
    fn test_parse_or_override() {
        let value: u64 = parse_or("LEMON_DEBOUNCE_MS", Some(" 250 ".into()), 500).unwrap();
        assert_eq!(value, 250);
    }

    #[test]
    fn test_parse_or_invalid() {
        let result: Result<u64> = parse_or("LEMON_DEBOUNCE_MS", Some("soon".into()), 500);
        assert!(matches!(result, Err(LemonError::Other(_))));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample_config() -> Config {
        Config {
            feed_url: DEFAULT_FEED_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            data_dir: PathBuf::from("/tmp/lemon"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    #[test]
    fn test_paths_under_data_dir() {
        let config = sample_config();
        assert!(config.database_path().ends_with("little_lemon.db"));
        assert!(config.preferences_path().starts_with("/tmp/lemon"));
        assert!(config.log_path().starts_with("/tmp/lemon"));
    }

    #[test]
    fn test_log_resolved_reaches_installed_subscriber() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || sample_config().log_resolved());

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Configuration loaded"));
        assert!(output.contains("debounce_ms=500"));
        assert!(output.contains("feed_default=true"));
    }
}
