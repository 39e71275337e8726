//! Game settings
//!
//! Static configuration for a session: arena size, the symbolic map, projectile
//! tuning and opponent behaviour. Loaded from JSON on native targets; any
//! field missing from the file falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to load or validate settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Per-tick Bernoulli trial probabilities for autonomous tanks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentSettings {
    /// Chance an enemy attempts to fire this tick
    pub shoot_probability: f64,
    /// Chance an enemy picks a new random facing this tick
    pub change_direction_probability: f64,
}

impl Default for OpponentSettings {
    fn default() -> Self {
        Self {
            shoot_probability: ENEMY_SHOOT_PROBABILITY,
            change_direction_probability: ENEMY_CHANGE_DIRECTION_PROBABILITY,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side length of the square arena in pixels
    pub canvas_size: f32,
    /// Symbolic map, one string per row:
    /// `e` empty, `b` brick, `s` concrete, `p` player spawn, `x` enemy spawn
    pub grid: Vec<String>,
    /// Bullet travel per tick in pixels
    pub bullet_speed: f32,
    /// Bullet side length in pixels
    pub bullet_size: f32,
    /// Minimum time between two shots of the same tank
    pub shot_throttle_ms: u64,
    /// Cadence the loop driver should tick at
    pub tick_interval_ms: u64,
    pub opponent: OpponentSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            grid: DEFAULT_GRID.iter().map(|row| row.to_string()).collect(),
            bullet_speed: BULLET_SPEED,
            bullet_size: BULLET_SIZE,
            shot_throttle_ms: SHOT_THROTTLE_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
            opponent: OpponentSettings::default(),
        }
    }
}

impl Settings {
    /// Default tuning with a custom map
    pub fn with_grid<S: AsRef<str>>(rows: &[S]) -> Self {
        Self {
            grid: rows.iter().map(|row| row.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Tanks occupy exactly one coarse map cell
    #[inline]
    pub fn tank_size(&self) -> f32 {
        self.terrain_size()
    }

    /// Pixel size of one coarse map cell
    #[inline]
    pub fn terrain_size(&self) -> f32 {
        self.canvas_size / self.grid.len().max(1) as f32
    }

    /// Pixel size of one destructible terrain node
    #[inline]
    pub fn node_size(&self) -> f32 {
        self.terrain_size() / NODES_PER_CELL as f32
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Map contents are checked later, when the world is built from them.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.canvas_size > 0.0) {
            return Err(SettingsError::Invalid {
                field: "canvas_size",
                reason: "must be positive",
            });
        }
        if !(self.bullet_speed > 0.0) {
            return Err(SettingsError::Invalid {
                field: "bullet_speed",
                reason: "must be positive",
            });
        }
        if !(self.bullet_size > 0.0) {
            return Err(SettingsError::Invalid {
                field: "bullet_size",
                reason: "must be positive",
            });
        }
        let probabilities = [
            self.opponent.shoot_probability,
            self.opponent.change_direction_probability,
        ];
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(SettingsError::Invalid {
                field: "opponent",
                reason: "probabilities must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let settings = Settings::default();
        assert_eq!(settings.grid.len(), 13);
        assert!((settings.tank_size() - 46.0).abs() < 1e-4);
        assert!((settings.node_size() - 11.5).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "canvas_size": 120.0, "grid": ["pe", "ex"] }"#).unwrap();
        assert_eq!(settings.grid, vec!["pe".to_string(), "ex".to_string()]);
        assert_eq!(settings.tank_size(), 60.0);
        assert_eq!(settings.shot_throttle_ms, SHOT_THROTTLE_MS);
        assert_eq!(settings.opponent, OpponentSettings::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "canvas_size": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "canvas_size",
                ..
            }
        ));

        let err =
            Settings::from_json(r#"{ "opponent": { "shoot_probability": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "opponent", .. }));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_map() {
        let settings = Settings::with_grid(&["pbs", "eex"]);
        let json = serde_json::to_string(&settings).unwrap();
        let loaded = Settings::from_json(&json).unwrap();
        assert_eq!(loaded.grid, settings.grid);
    }
}
