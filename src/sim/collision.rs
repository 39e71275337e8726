//! Entity motion and collision against terrain and arena bounds
//!
//! Tanks move in single-pixel steps that are vetoed before they happen, so a
//! tank can never end up overlapping a wall. Bullets move in larger jumps and
//! are checked after the fact.

use super::state::{Bullet, Direction, Tank};
use super::terrain::{Terrain, TerrainNode};
use crate::settings::Settings;

/// Result of checking a bullet after it moved
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionCheck {
    /// Whether the bullet must be removed this tick
    pub explode: bool,
    /// Terrain node struck, with its index in the terrain collection
    pub hit_node: Option<(usize, TerrainNode)>,
}

impl ExplosionCheck {
    pub fn none() -> Self {
        Self {
            explode: false,
            hit_node: None,
        }
    }

    pub fn out_of_bounds() -> Self {
        Self {
            explode: true,
            hit_node: None,
        }
    }
}

/// Try to move `tank` one pixel toward `direction`.
///
/// The tank always turns to face `direction`. The step is vetoed if the moved
/// tank would overlap terrain or leave `[0, canvas_size - tank_size]` on the
/// moving axis; the animation frame advances only when the step happens.
pub fn attempt_move_tank(
    tank: &mut Tank,
    direction: Direction,
    terrain: &Terrain,
    settings: &Settings,
) -> bool {
    tank.direction = direction;

    let tank_size = settings.tank_size();
    let next = tank.pos + direction.unit();
    let limit = settings.canvas_size - tank_size;
    let coordinate = match direction {
        Direction::Up | Direction::Down => next.y,
        Direction::Left | Direction::Right => next.x,
    };
    if coordinate < 0.0 || coordinate > limit {
        return false;
    }

    let moved = Tank {
        pos: next,
        ..tank.clone()
    };
    if terrain.collides(&moved.rect(tank_size)) {
        return false;
    }

    tank.pos = next;
    tank.frame = tank.frame.toggled();
    true
}

/// Move a bullet `speed` pixels along its facing axis
#[inline]
pub fn advance_bullet(bullet: &mut Bullet, speed: f32) {
    bullet.pos += bullet.direction.unit() * speed;
}

/// Decide whether a bullet that already moved this tick explodes.
///
/// Leaving `[0, canvas_size]` on either axis takes precedence and reports no
/// node. Otherwise the first terrain node overlapping the bullet is reported
/// whatever its kind; the caller decides whether it breaks.
pub fn bullet_should_explode(bullet: &Bullet, terrain: &Terrain, settings: &Settings) -> ExplosionCheck {
    let canvas = settings.canvas_size;
    let pos = bullet.pos;
    if pos.x < 0.0 || pos.y < 0.0 || pos.x > canvas || pos.y > canvas {
        return ExplosionCheck::out_of_bounds();
    }

    match terrain.find_colliding_node(&bullet.rect(settings.bullet_size)) {
        Some((index, node)) => ExplosionCheck {
            explode: true,
            hit_node: Some((index, *node)),
        },
        None => ExplosionCheck::none(),
    }
}
