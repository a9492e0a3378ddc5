//! Configuration management for JobTok
//!
//! Handles config file loading/saving and environment overrides.
//! Config is stored at ~/.config/jobtok/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::playback::DEFAULT_VISIBILITY_THRESHOLD;

/// Items kept mounted above and below the visible ones
pub const DEFAULT_OVERSCAN: usize = 1;

/// UI tick used when the config doesn't set one
pub const DEFAULT_TICK_MS: u64 = 100;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Feed location: path to a JSON export or an http(s) endpoint
    pub source: Option<String>,
    /// Signed-in user (owner checks, profile screen)
    pub user_id: Option<String>,
    /// Fraction of a card that must be visible before it plays (0.0 - 1.0)
    pub visibility_threshold: Option<f32>,
    /// Cards mounted beyond the visible ones
    pub overscan: Option<usize>,
    /// External player for `open` (vlc, mpv)
    pub player: Option<String>,
    /// UI tick in milliseconds
    pub tick_ms: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/jobtok/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jobtok").join("config.toml"))
    }

    /// Directory for the rolling log file
    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("jobtok").join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join("jobtok").join("logs"))
    }

    /// Feed export used when nothing else is configured
    pub fn default_source() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("jobtok").join("videos.json"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, or return default if unreadable
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Feed location with fallback chain:
    /// 1. Environment variable JOBTOK_SOURCE
    /// 2. `source` from the config file
    /// 3. videos.json in the data directory
    pub fn feed_source(&self) -> Option<String> {
        if let Ok(source) = std::env::var("JOBTOK_SOURCE") {
            if !source.trim().is_empty() {
                return Some(source);
            }
        }

        if let Some(ref source) = self.source {
            return Some(source.clone());
        }

        Self::default_source().map(|p| p.display().to_string())
    }

    /// Current user, JOBTOK_USER taking precedence over the file
    pub fn current_user(&self) -> Option<String> {
        std::env::var("JOBTOK_USER")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.user_id.clone())
    }

    pub fn threshold(&self) -> f32 {
        self.visibility_threshold
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_VISIBILITY_THRESHOLD)
    }

    pub fn overscan(&self) -> usize {
        self.overscan.unwrap_or(DEFAULT_OVERSCAN)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.filter(|ms| *ms > 0).unwrap_or(DEFAULT_TICK_MS))
    }
}
