// Data path utilities.
// Resolves where the menu database, preferences, and log file live.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const DATABASE_FILE: &str = "little_lemon.db";
const PREFERENCES_FILE: &str = "prefs.json";
const LOG_FILE: &str = "lemon.log";

/// Get the platform data directory (~/.local/share/little-lemon on Linux).
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "little-lemon").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the SQLite menu database.
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Path to the key/value preferences file.
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE)
}

/// Path to the log file.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths() {
        let dir = Path::new("/tmp/lemon");

        assert!(database_path(dir).ends_with("lemon/little_lemon.db"));
        assert!(preferences_path(dir).ends_with("lemon/prefs.json"));
        assert!(log_path(dir).ends_with("lemon/lemon.log"));
    }
}
