//! Persisted user preferences
//!
//! Preferences survive restarts; currently this is just the text-to-speech
//! toggle, stored as JSON in the platform config directory.

use crate::{DocChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether assistant answers are spoken aloud as they arrive
    #[serde(default)]
    pub tts_enabled: bool,
}

impl Settings {
    /// Default location: `<config dir>/docchat/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docchat").join(SETTINGS_FILE))
    }

    /// Load settings from disk, falling back to defaults when the file is
    /// missing or unreadable. A corrupt file is not fatal.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Load from the default location, or defaults when unavailable.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Write settings to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| DocChatError::ConfigError(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Save to the default location; a missing config dir is an error.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| DocChatError::ConfigError("No config directory available".into()))?;
        self.save_to(&path)
    }
}
