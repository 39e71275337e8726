//! Shooting and bullet resolution
//!
//! Every bullet is judged against the terrain and tanks as they stood at the
//! start of the tick. Removals are collected as index sets during the scan and
//! applied once it finishes.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{advance_bullet, bullet_should_explode};
use super::geometry::rects_intersect;
use super::state::{Author, Bullet, GamePhase, Outcome, Tank, World, retain_unmarked};
use crate::settings::Settings;

/// Fire a bullet from `tank` unless it is still throttled.
///
/// A shot is allowed once `shot_throttle_ms` has fully elapsed since the last
/// one. The bullet is centred on the tank and faces the tank's direction.
/// Returns whether a bullet was spawned.
pub fn shoot(
    tank: &mut Tank,
    author: Author,
    bullets: &mut Vec<Bullet>,
    settings: &Settings,
    now_ms: u64,
) -> bool {
    if let Some(last) = tank.last_shot_ms {
        if now_ms < last.saturating_add(settings.shot_throttle_ms) {
            return false;
        }
    }

    let pos = tank.center(settings.tank_size()) - Vec2::splat(settings.bullet_size / 2.0);
    bullets.push(Bullet {
        pos,
        direction: tank.direction,
        author,
    });
    tank.last_shot_ms = Some(now_ms);
    log::trace!("{:?} fired {:?} from ({:.1}, {:.1})", author, tank.direction, pos.x, pos.y);
    true
}

/// Advance every bullet and resolve its impacts.
///
/// An enemy bullet reaching the player ends the game on the spot: the scan
/// stops and nothing collected so far is applied. A player bullet destroys the
/// first enemy it overlaps. Emptying the enemy collection wins the game.
/// The world phase is updated before the outcome is returned.
pub fn resolve_bullets(world: &mut World, settings: &Settings) -> Option<Outcome> {
    let tank_size = settings.tank_size();
    let player_rect = world.player.rect(tank_size);

    let mut exploded = BTreeSet::new();
    let mut broken_nodes = BTreeSet::new();
    let mut destroyed_enemies = BTreeSet::new();

    for (index, bullet) in world.bullets.iter_mut().enumerate() {
        advance_bullet(bullet, settings.bullet_speed);

        let check = bullet_should_explode(bullet, &world.terrain, settings);
        if check.explode {
            exploded.insert(index);
            if let Some((node_index, node)) = check.hit_node {
                if node.kind.is_destructible() {
                    broken_nodes.insert(node_index);
                }
            }
            continue;
        }

        let rect = bullet.rect(settings.bullet_size);
        match bullet.author {
            Author::Enemy => {
                if rects_intersect(&rect, &player_rect) {
                    log::info!("Player tank destroyed");
                    world.phase = GamePhase::Over(Outcome::Loss);
                    return Some(Outcome::Loss);
                }
            }
            Author::Player => {
                let hit = world
                    .enemies
                    .iter()
                    .position(|enemy| rects_intersect(&rect, &enemy.rect(tank_size)));
                if let Some(enemy_index) = hit {
                    destroyed_enemies.insert(enemy_index);
                    exploded.insert(index);
                }
            }
        }
    }

    retain_unmarked(&mut world.bullets, &exploded);

    if !broken_nodes.is_empty() {
        log::debug!("{} brick node(s) destroyed", broken_nodes.len());
        world.terrain.remove_nodes(&broken_nodes);
    }

    if !destroyed_enemies.is_empty() {
        retain_unmarked(&mut world.enemies, &destroyed_enemies);
        log::debug!(
            "{} enemy tank(s) destroyed, {} left",
            destroyed_enemies.len(),
            world.enemies.len()
        );
        if world.enemies.is_empty() {
            log::info!("All enemy tanks destroyed");
            world.phase = GamePhase::Over(Outcome::Win);
            return Some(Outcome::Win);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Direction;
    use crate::sim::terrain::TerrainKind;

    // 4x4 map at 40 px per cell: tanks are 40 px, terrain nodes 10 px
    fn world(rows: &[&str]) -> (World, Settings) {
        let settings = Settings {
            canvas_size: 160.0,
            ..Settings::with_grid(rows)
        };
        (World::new(&settings).unwrap(), settings)
    }

    fn bullet(x: f32, y: f32, direction: Direction, author: Author) -> Bullet {
        Bullet {
            pos: Vec2::new(x, y),
            direction,
            author,
        }
    }

    #[test]
    fn test_shoot_is_throttled() {
        let (mut world, settings) = world(&["peee", "eeee", "eeee", "eeee"]);
        let throttle = settings.shot_throttle_ms;

        assert!(shoot(&mut world.player, Author::Player, &mut world.bullets, &settings, 1_000));
        assert!(!shoot(
            &mut world.player,
            Author::Player,
            &mut world.bullets,
            &settings,
            1_000 + throttle - 1
        ));
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.player.last_shot_ms, Some(1_000));

        assert!(shoot(
            &mut world.player,
            Author::Player,
            &mut world.bullets,
            &settings,
            1_000 + throttle + 1
        ));
        assert_eq!(world.bullets.len(), 2);
        assert_eq!(world.player.last_shot_ms, Some(1_000 + throttle + 1));
    }

    #[test]
    fn test_shot_allowed_once_throttle_fully_elapsed() {
        let (mut world, settings) = world(&["peee", "eeee", "eeee", "eeee"]);
        world.player.last_shot_ms = Some(100);
        let at = 100 + settings.shot_throttle_ms;
        assert!(shoot(&mut world.player, Author::Player, &mut world.bullets, &settings, at));
    }

    #[test]
    fn test_first_shot_at_time_zero() {
        let (mut world, settings) = world(&["peee", "eeee", "eeee", "eeee"]);
        assert!(shoot(&mut world.player, Author::Player, &mut world.bullets, &settings, 0));
    }

    #[test]
    fn test_bullet_spawns_centred_on_tank() {
        let (mut world, settings) = world(&["eeee", "epee", "eeee", "eeee"]);
        world.player.direction = Direction::Left;
        shoot(&mut world.player, Author::Player, &mut world.bullets, &settings, 0);

        let spawned = &world.bullets[0];
        // Tank spans 40..80, bullet is 10 wide
        assert_eq!(spawned.pos, Vec2::new(55.0, 55.0));
        assert_eq!(spawned.direction, Direction::Left);
        assert_eq!(spawned.author, Author::Player);
    }

    #[test]
    fn test_brick_hit_removes_node_and_bullet() {
        let (mut world, settings) = world(&["peeb", "eeee", "eeee", "eeee"]);
        let nodes_before = world.terrain.len();
        world
            .bullets
            .push(bullet(106.0, 0.0, Direction::Right, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert!(world.bullets.is_empty());
        assert_eq!(world.terrain.len(), nodes_before - 1);
        // First node of the block in iteration order is gone
        assert!(!world
            .terrain
            .nodes()
            .iter()
            .any(|n| n.row == 0 && n.col == 12));
    }

    #[test]
    fn test_concrete_hit_keeps_terrain() {
        let (mut world, settings) = world(&["peees", "eeeee", "eeeee", "eeeee", "eeeee"]);
        let nodes_before = world.terrain.nodes().to_vec();
        assert!(nodes_before.iter().all(|n| n.kind == TerrainKind::Concrete));
        // Concrete block starts at x = 128 on a 5x5 map
        world
            .bullets
            .push(bullet(115.0, 0.0, Direction::Right, Author::Enemy));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert!(world.bullets.is_empty());
        assert_eq!(world.terrain.nodes(), nodes_before.as_slice());
    }

    #[test]
    fn test_out_of_bounds_bullet_has_no_side_effects() {
        let (mut world, settings) = world(&["bxee", "epee", "eeee", "eeee"]);
        let nodes_before = world.terrain.len();
        // Leaves the arena while still overlapping the enemy
        world
            .bullets
            .push(bullet(50.0, 2.0, Direction::Up, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert!(world.bullets.is_empty());
        assert_eq!(world.terrain.len(), nodes_before);
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_on_player_is_loss() {
        let (mut world, settings) = world(&["peeb", "eeee", "eeee", "eeex"]);
        let nodes_before = world.terrain.len();
        world
            .bullets
            .push(bullet(44.0, 15.0, Direction::Left, Author::Enemy));
        // Would break a brick if the scan continued
        world
            .bullets
            .push(bullet(106.0, 0.0, Direction::Right, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), Some(Outcome::Loss));
        assert_eq!(world.phase, GamePhase::Over(Outcome::Loss));
        assert_eq!(world.terrain.len(), nodes_before);
        assert_eq!(world.bullets.len(), 2);
    }

    #[test]
    fn test_player_bullet_ignores_player() {
        let (mut world, settings) = world(&["peee", "eeee", "eeee", "eeex"]);
        world
            .bullets
            .push(bullet(15.0, 15.0, Direction::Down, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_bullet_destroys_enemy() {
        let (mut world, settings) = world(&["pexe", "eeee", "eeee", "eeex"]);
        world
            .bullets
            .push(bullet(71.0, 15.0, Direction::Right, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert!(world.bullets.is_empty());
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].pos, Vec2::new(120.0, 120.0));
    }

    #[test]
    fn test_last_enemy_destroyed_is_win() {
        let (mut world, settings) = world(&["pexe", "eeee", "eeee", "eeee"]);
        world
            .bullets
            .push(bullet(71.0, 15.0, Direction::Right, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), Some(Outcome::Win));
        assert!(world.enemies.is_empty());
        assert_eq!(world.phase, GamePhase::Over(Outcome::Win));
    }

    #[test]
    fn test_two_bullets_on_one_enemy_snapshot() {
        let (mut world, settings) = world(&["pexe", "eeee", "eeee", "eeex"]);
        world
            .bullets
            .push(bullet(71.0, 5.0, Direction::Right, Author::Player));
        world
            .bullets
            .push(bullet(71.0, 25.0, Direction::Right, Author::Player));

        assert_eq!(resolve_bullets(&mut world, &settings), None);
        // Both bullets judged against the pre-tick enemy list
        assert!(world.bullets.is_empty());
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_no_enemies_is_not_a_win() {
        let (mut world, settings) = world(&["peee", "eeee", "eeee", "eeee"]);
        world
            .bullets
            .push(bullet(60.0, 60.0, Direction::Right, Author::Player));
        assert_eq!(resolve_bullets(&mut world, &settings), None);
        assert_eq!(world.phase, GamePhase::Playing);
    }
}
