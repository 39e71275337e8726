//! World state and core simulation types
//!
//! One `World` value is built from the map at session start and then mutated
//! in place by every tick until the game ends.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::terrain::{MapError, Terrain, build_terrain, parse_grid};
use crate::settings::Settings;

/// Cardinal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit step in screen space (y grows downward)
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Two-frame track animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frame {
    #[default]
    One,
    Two,
}

impl Frame {
    pub fn toggled(self) -> Self {
        match self {
            Frame::One => Frame::Two,
            Frame::Two => Frame::One,
        }
    }
}

/// A tank, player-controlled or autonomous
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub direction: Direction,
    pub frame: Frame,
    /// Clock reading of the last shot, `None` until the first one
    pub last_shot_ms: Option<u64>,
}

impl Tank {
    pub fn new(pos: Vec2, direction: Direction) -> Self {
        Self {
            pos,
            direction,
            frame: Frame::One,
            last_shot_ms: None,
        }
    }

    #[inline]
    pub fn rect(&self, tank_size: f32) -> Rect {
        Rect::square(self.pos, tank_size)
    }

    /// Centre point given the tank's side length
    #[inline]
    pub fn center(&self, tank_size: f32) -> Vec2 {
        self.pos + Vec2::splat(tank_size / 2.0)
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub direction: Direction,
    pub author: Author,
}

impl Bullet {
    #[inline]
    pub fn rect(&self, bullet_size: f32) -> Rect {
        Rect::square(self.pos, bullet_size)
    }
}

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every enemy tank was destroyed
    Win,
    /// The player tank was hit
    Loss,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::Win
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Over(Outcome),
}

/// Complete world state consumed by the renderer after each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Tank,
    /// Autonomous tanks, in spawn-marker order
    pub enemies: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    pub terrain: Terrain,
    pub phase: GamePhase,
    /// Number of ticks that ran to completion or ended the game
    pub time_ticks: u64,
}

impl World {
    /// Build the initial world from the settings' symbolic map
    pub fn new(settings: &Settings) -> Result<Self, MapError> {
        let grid = parse_grid(&settings.grid)?;
        let layout = build_terrain(&grid, settings.terrain_size())?;

        let world = Self {
            player: Tank::new(layout.player_spawn, Direction::Up),
            enemies: layout
                .enemy_spawns
                .into_iter()
                .map(|pos| Tank::new(pos, Direction::Down))
                .collect(),
            bullets: Vec::new(),
            terrain: layout.terrain,
            phase: GamePhase::Playing,
            time_ticks: 0,
        };

        log::info!(
            "World built: {}x{} map, {} terrain nodes, {} enemies",
            grid.len(),
            grid[0].len(),
            world.terrain.len(),
            world.enemies.len()
        );
        Ok(world)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::Over(outcome) => Some(outcome),
        }
    }
}

/// Remove the elements whose indices are marked, preserving the order of the rest
pub(crate) fn retain_unmarked<T>(items: &mut Vec<T>, marked: &BTreeSet<usize>) {
    if marked.is_empty() {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked.contains(&index);
        index += 1;
        keep
    });
}
