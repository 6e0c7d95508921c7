//! Match settings and physics tuning
//!
//! Loaded from a JSON file by the native driver; every field falls back to
//! its default when missing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Data-driven physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Speed lost per second of rolling
    pub drag: f32,
    /// Speed below which a ball snaps to rest
    pub min_speed: f32,
    /// Speed of a full-force cue strike (units per tick)
    pub max_shot_speed: f32,
    pub ball_radius: f32,
    pub pocket_radius: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            drag: DRAG,
            min_speed: MIN_SPEED,
            max_shot_speed: MAX_SHOT_SPEED,
            ball_radius: BALL_RADIUS,
            pocket_radius: POCKET_RADIUS,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the start-player draw (and the demo driver's shot picker)
    pub seed: u64,
    pub player_names: [String; 2],
    pub tuning: PhysicsTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x8BA1_1000,
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            tuning: PhysicsTuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{ "seed": 42, "tuning": { "drag": 2.5 } }"#)
            .expect("valid settings");
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.tuning.drag, 2.5);
        assert_eq!(settings.tuning.min_speed, MIN_SPEED);
        assert_eq!(settings.player_names[1], "Player 2");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Settings::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        match err {
            SettingsError::Io { path, .. } => {
                assert!(path.ends_with("settings.json"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.player_names[0] = "Ada".to_string();
        let json = settings.to_json().expect("serializes");
        let back = Settings::from_json_str(&json).expect("round trip");
        assert_eq!(back.player_names[0], "Ada");
        assert_eq!(back.tuning, settings.tuning);
    }
}
