//! Fixed timestep simulation tick
//!
//! Core transition that advances the world by one step. Order within a tick is
//! fixed: bullets first, then the player's input, then every enemy.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::time::Instant;

use super::ai::{TrialSource, update_all_enemies};
use super::collision::attempt_move_tank;
use super::combat::{resolve_bullets, shoot};
use super::state::{Author, Direction, Outcome, World};
use super::terrain::MapError;
use crate::settings::Settings;

/// Logical controls the input layer can hold down
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

/// When several movement controls are held, the first one listed wins
const MOVE_PRIORITY: [(Control, Direction); 4] = [
    (Control::Right, Direction::Right),
    (Control::Left, Direction::Left),
    (Control::Up, Direction::Up),
    (Control::Down, Direction::Down),
];

/// Set of currently held controls.
///
/// The tick only reads it, except that `Fire` is removed once it actually
/// produced a shot, so a held key fires once per press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    held: BTreeSet<Control>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Movement direction chosen by the held controls, if any
    pub fn movement(&self) -> Option<Direction> {
        MOVE_PRIORITY
            .iter()
            .find(|(control, _)| self.is_held(*control))
            .map(|&(_, direction)| direction)
    }
}

impl FromIterator<Control> for Controls {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

/// Monotonic millisecond time source used for shot throttling
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Hand-driven clock for deterministic runs
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward; the clock never goes backwards
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Advance the world by one tick.
///
/// Returns the outcome on the tick the game ends and `None` on every other
/// tick, including all ticks after the end, which leave the world untouched.
pub fn tick<C, T>(
    world: &mut World,
    controls: &mut Controls,
    settings: &Settings,
    clock: &C,
    trials: &mut T,
) -> Option<Outcome>
where
    C: Clock + ?Sized,
    T: TrialSource + ?Sized,
{
    if world.is_over() {
        return None;
    }

    world.time_ticks += 1;
    let now_ms = clock.now_ms();

    if let Some(outcome) = resolve_bullets(world, settings) {
        log::info!("Game over after {} ticks: {:?}", world.time_ticks, outcome);
        return Some(outcome);
    }

    apply_player_input(world, controls, settings, now_ms);
    update_all_enemies(world, settings, now_ms, trials);

    None
}

fn apply_player_input(world: &mut World, controls: &mut Controls, settings: &Settings, now_ms: u64) {
    if let Some(direction) = controls.movement() {
        attempt_move_tank(&mut world.player, direction, &world.terrain, settings);
    }

    if controls.is_held(Control::Fire)
        && shoot(
            &mut world.player,
            Author::Player,
            &mut world.bullets,
            settings,
            now_ms,
        )
    {
        controls.release(Control::Fire);
    }
}

/// A running session: world, configuration and the capabilities a tick needs
pub struct Simulation<C: Clock, T: TrialSource> {
    world: World,
    settings: Settings,
    clock: C,
    trials: T,
    on_game_over: Option<Box<dyn FnOnce(Outcome)>>,
}

impl<C: Clock, T: TrialSource> Simulation<C, T> {
    pub fn new(settings: Settings, clock: C, trials: T) -> Result<Self, MapError> {
        let world = World::new(&settings)?;
        Ok(Self {
            world,
            settings,
            clock,
            trials,
            on_game_over: None,
        })
    }

    /// Register the callback fired when the game ends. It runs at most once.
    pub fn on_game_over(mut self, callback: impl FnOnce(Outcome) + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }

    /// Run one tick with the given held controls
    pub fn step(&mut self, controls: &mut Controls) -> Option<Outcome> {
        let outcome = tick(
            &mut self.world,
            controls,
            &self.settings,
            &self.clock,
            &mut self.trials,
        );
        if let Some(outcome) = outcome {
            if let Some(callback) = self.on_game_over.take() {
                callback(outcome);
            }
        }
        outcome
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for scenario setup
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_over(&self) -> bool {
        self.world.is_over()
    }
}
