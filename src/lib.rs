//! Tile Tanks - a tile-based tank combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (terrain, motion, combat, opponents)
//! - `settings`: Session configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{OpponentSettings, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Arena side length in pixels
    pub const CANVAS_SIZE: f32 = 598.0;
    /// Each coarse map cell splits into this many terrain nodes per axis
    pub const NODES_PER_CELL: usize = 4;

    /// Bullet travel per tick in pixels
    pub const BULLET_SPEED: f32 = 5.0;
    /// Bullet side length in pixels
    pub const BULLET_SIZE: f32 = 10.0;
    /// Minimum delay between two shots from the same tank
    pub const SHOT_THROTTLE_MS: u64 = 500;
    /// Loop driver cadence (100 Hz)
    pub const TICK_INTERVAL_MS: u64 = 10;

    /// Opponent trial probabilities
    pub const ENEMY_SHOOT_PROBABILITY: f64 = 0.05;
    pub const ENEMY_CHANGE_DIRECTION_PROBABILITY: f64 = 0.01;

    /// Stock battlefield
    pub const DEFAULT_GRID: [&str; 13] = [
        "peeebeeebeeex",
        "eeeebesebeeee",
        "eeeeeeseeeeee",
        "eeeeeeseeeeee",
        "bbeeeeseeeebb",
        "eeeeebbbeeeee",
        "essssbebsssse",
        "eeeeebbbeeeee",
        "bbeeeeseeeebb",
        "eeeeeeseeeeee",
        "eeeeeeseeeeee",
        "eeeeebbbeeeee",
        "xeeeebebeeeex",
    ];
}
