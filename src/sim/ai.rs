//! Autonomous opponent controller
//!
//! Enemies are memoryless: every tick each one rolls two independent trials,
//! maybe fires, pushes forward one pixel and turns at random when it either
//! rolled a turn or bumped into something. Randomness comes from a
//! [`TrialSource`] so tests can script every outcome.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::attempt_move_tank;
use super::combat::shoot;
use super::state::{Author, Bullet, Direction, Tank, World};
use super::terrain::Terrain;
use crate::settings::Settings;

/// Source of the opponents' random decisions
pub trait TrialSource {
    /// Bernoulli trial succeeding with `probability`
    fn chance(&mut self, probability: f64) -> bool;
    /// Uniformly random cardinal direction
    fn direction(&mut self) -> Direction;
}

/// Seeded PCG-backed trials, reproducible for a given seed
#[derive(Debug, Clone)]
pub struct SeededTrials {
    rng: Pcg32,
}

impl SeededTrials {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl TrialSource for SeededTrials {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    fn direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }
}

/// Pre-recorded trial outcomes, consumed in order.
///
/// Once a queue runs dry, trials fail and directions fall back to `Up`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrials {
    chances: VecDeque<bool>,
    directions: VecDeque<Direction>,
}

impl ScriptedTrials {
    pub fn new(
        chances: impl IntoIterator<Item = bool>,
        directions: impl IntoIterator<Item = Direction>,
    ) -> Self {
        Self {
            chances: chances.into_iter().collect(),
            directions: directions.into_iter().collect(),
        }
    }

    /// Script only the Bernoulli trials
    pub fn with_chances(chances: impl IntoIterator<Item = bool>) -> Self {
        Self {
            chances: chances.into_iter().collect(),
            directions: VecDeque::new(),
        }
    }
}

impl TrialSource for ScriptedTrials {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn direction(&mut self) -> Direction {
        self.directions.pop_front().unwrap_or(Direction::Up)
    }
}

/// Run one decision cycle for a single enemy tank.
///
/// Both trials are rolled up front (shoot, then turn). The turn only changes
/// facing; it never moves the tank retroactively.
pub fn update_enemy<T: TrialSource + ?Sized>(
    enemy: &mut Tank,
    bullets: &mut Vec<Bullet>,
    terrain: &Terrain,
    settings: &Settings,
    now_ms: u64,
    trials: &mut T,
) {
    let should_shoot = trials.chance(settings.opponent.shoot_probability);
    let should_turn = trials.chance(settings.opponent.change_direction_probability);

    if should_shoot {
        shoot(enemy, Author::Enemy, bullets, settings, now_ms);
    }

    let facing = enemy.direction;
    let moved = attempt_move_tank(enemy, facing, terrain, settings);

    if should_turn || !moved {
        enemy.direction = trials.direction();
    }
}

/// Drive every enemy in collection order
pub fn update_all_enemies<T: TrialSource + ?Sized>(
    world: &mut World,
    settings: &Settings,
    now_ms: u64,
    trials: &mut T,
) {
    for enemy in world.enemies.iter_mut() {
        update_enemy(
            enemy,
            &mut world.bullets,
            &world.terrain,
            settings,
            now_ms,
            trials,
        );
    }
}
