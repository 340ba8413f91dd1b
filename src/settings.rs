//! Game settings and preferences
//!
//! Read from a JSON file next to the executable. Missing fields take their
//! defaults, so an empty object is a valid settings file.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Levels ===
    /// Directory level files are read from
    pub level_dir: PathBuf,
    /// Level file names, played in order
    pub levels: Vec<String>,
    /// Show the intro before the first level
    pub play_intro: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub mute: bool,

    /// RNG seed; taken from the clock when unset
    pub seed: Option<u64>,

    /// Physics constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            level_dir: PathBuf::from("maps"),
            levels: vec!["map1.json".into(), "map2.json".into(), "map3.json".into()],
            play_intro: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute: false,

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings JSON. Tuning values are sanitized.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[inline]
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Effective sound effect volume (respects mute and master)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.mute {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music volume (respects mute and master)
    pub fn effective_music_volume(&self) -> f32 {
        if self.mute {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let s = Settings::from_json(
            r#"{"levels": ["a.json"], "seed": 9, "tuning": {"walk_speed": 150}}"#,
        )
        .unwrap();
        assert_eq!(s.levels, vec!["a.json".to_string()]);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.tuning.walk_speed, 150.0);
        assert_eq!(s.tuning.bounce_height, Tuning::default().bounce_height);
        assert_eq!(s.viewport(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_effective_volume() {
        let mut s = Settings::default();
        assert!((s.effective_sfx_volume() - 0.8).abs() < 1e-6);
        assert!((s.effective_music_volume() - 0.56).abs() < 1e-6);
        s.mute = true;
        assert_eq!(s.effective_sfx_volume(), 0.0);
        assert_eq!(s.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let s = Settings::load("/nonexistent/blank-page/settings.json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_round_trip_json() {
        let s = Settings::default();
        assert_eq!(Settings::from_json(&s.to_json().unwrap()).unwrap(), s);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{\"levels\": 3}").is_err());
    }
}
