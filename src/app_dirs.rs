use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "viselitsa";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for persisted game state ($HOME/.local/state/viselitsa when HOME is set)
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn store_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("store.db"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("viselitsa.log"))
    }

    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("viselitsa_config.json"),
        }
    }
}
