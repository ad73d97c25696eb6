use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// Settings read from the config file; CLI flags take precedence
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Read word lists from this directory instead of the built-in ones
    pub wordbank_dir: Option<PathBuf>,
    /// Location of the history/preferences database
    pub store_path: Option<PathBuf>,
}

impl Config {
    /// Apply command line overrides on top of the file values
    pub fn merged(self, wordbank_dir: Option<PathBuf>, store_path: Option<PathBuf>) -> Self {
        Self {
            wordbank_dir: wordbank_dir.or(self.wordbank_dir),
            store_path: store_path.or(self.store_path),
        }
    }

    /// Store location, falling back to the platform state directory
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(AppDirs::store_path)
    }
}

/// JSON config file, by default in the platform config directory
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Missing files give defaults; malformed ones are logged and ignored
    pub fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(AppDirs::config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_both_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            br#"{"wordbank_dir": "/srv/words", "store_path": "/var/lib/viselitsa.db"}"#,
        )
        .unwrap();
        assert_eq!(
            FileConfigStore::new(&path).load(),
            Config {
                wordbank_dir: Some(PathBuf::from("/srv/words")),
                store_path: Some(PathBuf::from("/var/lib/viselitsa.db")),
            }
        );
    }

    #[test]
    fn missing_or_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::new(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"[1, 2").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"wordbank_dir": "/tmp/words"}"#).unwrap();
        let cfg = FileConfigStore::new(&path).load();
        assert_eq!(cfg.wordbank_dir, Some(PathBuf::from("/tmp/words")));
        assert_eq!(cfg.store_path, None);
    }

    #[test]
    fn cli_values_override_file_values() {
        let file = Config {
            wordbank_dir: Some(PathBuf::from("a")),
            store_path: Some(PathBuf::from("b")),
        };
        let merged = file.clone().merged(Some(PathBuf::from("c")), None);
        assert_eq!(merged.wordbank_dir, Some(PathBuf::from("c")));
        assert_eq!(merged.store_path, Some(PathBuf::from("b")));
        assert_eq!(merged.resolved_store_path(), Some(PathBuf::from("b")));
    }
}
