//! Player settings and preferences
//!
//! Persisted as a small JSON file, separate from the match records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Silence music and sound effects
    pub muted: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Where finished runs are recorded
    pub records_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            music_volume: 0.7,
            sfx_volume: 1.0,
            records_path: PathBuf::from("records.csv"),
        }
    }
}

impl Settings {
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.set_music_volume(settings.music_volume);
        settings.set_sfx_volume(settings.sfx_volume);
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "soul_hunter_settings_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_toggle_mute_keeps_volumes() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert!(settings.muted);
        assert_eq!(settings.music_volume, 0.7);
        assert_eq!(settings.sfx_volume, 1.0);
        assert!(!settings.toggle_mute());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_file_path("save_load");
        let mut settings = Settings::default();
        settings.muted = true;
        settings.set_music_volume(0.25);
        settings.records_path = PathBuf::from("elsewhere.csv");
        settings.save(&path).expect("save");

        let loaded = Settings::load(&path).expect("load");
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_file_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path).expect("load"), Settings::default());
    }

    #[test]
    fn test_partial_file_and_clamping() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "sfx_volume": 3.0 }"#).expect("write");
        let loaded = Settings::load(&path).expect("load");
        assert_eq!(loaded.sfx_volume, 1.0);
        assert_eq!(loaded.records_path, PathBuf::from("records.csv"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_file_path("malformed");
        fs::write(&path, "not json").expect("write");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
