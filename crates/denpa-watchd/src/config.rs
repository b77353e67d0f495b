use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use denpa_core::models::TrackedItem;

#[derive(Debug, thiserror::Error)]
pub enum WatchdError {
    #[error("watchlist error: {0}")]
    Watchlist(String),
    #[error("engine error: {0}")]
    Engine(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The TOML watchlist: the tracked items the daemon arms notifications for.
/// Item tables use the same camelCase keys as the engine wire protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(default)]
    pub items: Vec<TrackedItem>,
}

impl Watchlist {
    pub fn load(path: &Path) -> Result<Self, WatchdError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| WatchdError::Watchlist(e.to_string()))
    }

    /// Default watchlist location (XDG on Linux, AppData on Windows).
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "denpa")
            .map(|dirs| dirs.config_dir().join("watchlist.toml"))
            .unwrap_or_else(|| PathBuf::from("watchlist.toml"))
    }
}
