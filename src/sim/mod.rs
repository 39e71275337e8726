//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same map, settings, clock readings,
//! trial outcomes and held controls, a run is reproducible:
//! - One tick per call, no internal timers
//! - Randomness only through a `TrialSource`
//! - Stable iteration order (terrain in build order, tanks in spawn order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod geometry;
pub mod state;
pub mod terrain;
pub mod tick;

pub use ai::{ScriptedTrials, SeededTrials, TrialSource, update_all_enemies, update_enemy};
pub use collision::{ExplosionCheck, advance_bullet, attempt_move_tank, bullet_should_explode};
pub use combat::{resolve_bullets, shoot};
pub use geometry::{Rect, rects_intersect};
pub use state::{Author, Bullet, Direction, Frame, GamePhase, Outcome, Tank, World};
pub use terrain::{
    MapError, MapSymbol, Terrain, TerrainKind, TerrainLayout, TerrainNode, build_terrain,
    find_colliding_node, parse_grid,
};
pub use tick::{Clock, Control, Controls, ManualClock, MonotonicClock, Simulation, tick};
