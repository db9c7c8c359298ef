// Key/value preferences persisted as a JSON file.
// Holds the onboarding flag and the profile blob; writes go through a temp file and rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::Result;

/// String key/value store surviving restarts.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Preferences {
    /// Load preferences from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush()
    }

    /// Read a JSON value stored under `key`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    /// Store `value` as JSON under `key`.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, json)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "Saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_set_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");

        let mut prefs = Preferences::open(&path).unwrap();
        assert!(prefs.get("flag").is_none());
        prefs.set("flag", "true").unwrap();

        let prefs = Preferences::open(&path).unwrap();
        assert_eq!(prefs.get("flag"), Some("true"));
    }

    #[test]
    fn test_json_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open(temp_dir.path().join("prefs.json")).unwrap();

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        prefs.set_json("data", &data).unwrap();

        let read: Option<TestData> = prefs.get_json("data").unwrap();
        assert_eq!(read, Some(data));
        let missing: Option<TestData> = prefs.get_json("other").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_clear_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");
        let mut prefs = Preferences::open(&path).unwrap();

        prefs.set("a", "1").unwrap();
        prefs.set("b", "2").unwrap();

        prefs.clear().unwrap();
        assert!(prefs.get("a").is_none());
        let prefs = Preferences::open(&path).unwrap();
        assert!(prefs.get("b").is_none());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        assert!(Preferences::open(&path).is_err());
    }
}
