// Startup settings
// Read once at launch; nothing is written back.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::scene::{AmbientSoundId, Catalog, SceneId};
use crate::timer::session::{TimerMode, DEFAULT_MINUTES};

/// Language settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSettings {
    pub locale: Locale,
}

/// Timer defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub minutes: i64, // clamped to 1-60 when applied
    pub mode: TimerMode,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            mode: TimerMode::Focus,
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Pause the main stream when a timer session runs out
    pub pause_on_timer_end: bool,
    pub master_volume: f32,
    /// Initial mixer levels; loops stay off until toggled
    pub ambient_volumes: BTreeMap<AmbientSoundId, f32>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            pause_on_timer_end: false,
            master_volume: 1.0,
            ambient_volumes: BTreeMap::new(),
        }
    }
}

/// Stream URL overrides for the built-in catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub playlists: BTreeMap<SceneId, Vec<String>>,
    pub ambient_urls: BTreeMap<AmbientSoundId, String>,
}

/// Main application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub version: i32, // Settings schema version
    pub language: LanguageSettings,
    pub timer: TimerSettings,
    pub playback: PlaybackSettings,
    pub catalog: CatalogSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            language: LanguageSettings::default(),
            timer: TimerSettings::default(),
            playback: PlaybackSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from `path`, or return defaults if the file doesn't exist.
    /// The catalog overrides are validated here so a bad file fails at startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(?path, "settings: no settings file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: AppSettings =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.build_catalog()?;

        info!(?path, "settings: loaded");
        Ok(settings)
    }

    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(Catalog::with_overrides(
            &self.catalog.playlists,
            &self.catalog.ambient_urls,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.timer.minutes, 25);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "language": {{ "locale": "ja" }},
                "timer": {{ "minutes": 45, "mode": "breath" }},
                "playback": {{ "pause_on_timer_end": true, "ambient_volumes": {{ "fire": 0.3 }} }},
                "catalog": {{ "playlists": {{ "cafe": ["http://jazz"] }} }}
            }}"#
        )
        .unwrap();

        let settings = AppSettings::load(file.path()).unwrap();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.language.locale, Locale::Ja);
        assert_eq!(settings.timer.minutes, 45);
        assert_eq!(settings.timer.mode, TimerMode::Breath);
        assert!(settings.playback.pause_on_timer_end);
        assert_eq!(settings.playback.master_volume, 1.0);
        assert_eq!(settings.playback.ambient_volumes[&AmbientSoundId::Fire], 0.3);

        let catalog = settings.build_catalog().unwrap();
        assert_eq!(catalog.scene(SceneId::Cafe).playlist(), ["http://jazz"]);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = AppSettings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unknown_scene_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "catalog": {{ "playlists": {{ "jungle": ["http://x"] }} }} }}"#).unwrap();
        assert!(matches!(
            AppSettings::load(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn test_empty_playlist_is_catalog_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "catalog": {{ "playlists": {{ "rain": [] }} }} }}"#).unwrap();
        assert!(matches!(
            AppSettings::load(file.path()).unwrap_err(),
            ConfigError::Catalog(_)
        ));
    }
}
