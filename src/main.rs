//! Tile Tanks headless entry point
//!
//! Runs one session against the real clock with a scripted player and logs the
//! result. Rendering and keyboard input live outside this crate.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Tanks (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the embedding page on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use tile_tanks::Settings;
    use tile_tanks::sim::{Control, Controls, Direction, MonotonicClock, SeededTrials, Simulation};

    /// Give up after this many ticks if nobody has won
    const MAX_TICKS: u64 = 60_000;
    /// The scripted player turns this often
    const TURN_EVERY_TICKS: u64 = 150;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        log::info!("Session seed: {}", seed);

        let interval = Duration::from_millis(settings.tick_interval_ms);
        let mut sim = Simulation::new(settings, MonotonicClock::new(), SeededTrials::new(seed))?
            .on_game_over(|outcome| {
                if outcome.is_win() {
                    log::info!("Victory!");
                } else {
                    log::info!("Defeat.");
                }
            });

        let mut controls = Controls::new();
        let mut heading = 0;
        let mut outcome = None;
        for ticks in 0..MAX_TICKS {
            if ticks % TURN_EVERY_TICKS == 0 {
                for control in [Control::Up, Control::Down, Control::Left, Control::Right] {
                    controls.release(control);
                }
                controls.press(scripted_control(Direction::ALL[heading % Direction::ALL.len()]));
                heading += 1;
            }
            controls.press(Control::Fire);

            outcome = sim.step(&mut controls);
            if outcome.is_some() {
                break;
            }
            std::thread::sleep(interval);
        }

        let world = sim.world();
        match outcome {
            Some(outcome) => log::info!(
                "Finished after {} ticks: {:?} ({} enemies left)",
                world.time_ticks,
                outcome,
                world.enemies.len()
            ),
            None => log::warn!(
                "Stopped after {} ticks without a result ({} enemies left)",
                world.time_ticks,
                world.enemies.len()
            ),
        }
        Ok(())
    }

    fn scripted_control(direction: Direction) -> Control {
        match direction {
            Direction::Up => Control::Up,
            Direction::Down => Control::Down,
            Direction::Left => Control::Left,
            Direction::Right => Control::Right,
        }
    }
}
