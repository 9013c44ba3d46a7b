//! Application configuration.
//!
//! Loaded once at startup via `confy` from the platform config directory.
//! A missing or unreadable file falls back to defaults; the game comes up
//! regardless of config state.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunable application settings, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the profile blob. Defaults to the platform data
    /// directory when unset.
    pub save_directory: Option<PathBuf>,
    /// How often the session loop checks for elapsed task timers.
    pub sweep_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_directory: None,
            sweep_interval_ms: 500,
        }
    }
}

impl AppConfig {
    /// Load from the platform config location, falling back to defaults on
    /// any failure.
    pub fn load() -> Self {
        confy::load("grimoire", None).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config; using defaults");
            Self::default()
        })
    }

    /// Persist to the platform config location. Failures are logged, not
    /// fatal; the in-memory config keeps working.
    pub fn save(&self) {
        if let Err(e) = confy::store("grimoire", None, self) {
            warn!(error = %e, "failed to save config");
        }
    }

    /// Resolved path of the profile blob.
    pub fn store_path(&self) -> PathBuf {
        self.save_dir().join("profiles.json")
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    fn save_dir(&self) -> PathBuf {
        if let Some(dir) = &self.save_directory {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|p| p.join("grimoire"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
