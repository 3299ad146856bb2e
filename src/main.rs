//! Robot Soccer headless demo
//!
//! Runs a two-player match with seeded wandering controllers and logs the
//! score. Set `RUST_LOG=debug` to watch individual collisions.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use robot_soccer::sim::{MatchBuilder, is_sensed};
use robot_soccer::{SimConfig, SimError};

/// Demo length in ticks (two simulated minutes at 60 Hz)
const DEMO_TICKS: u64 = 2 * 60 * 60;

/// Re-roll wander commands this often
const COMMAND_PERIOD: u64 = 30;

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var("ROBOT_SOCCER_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SimError::InvalidConfig(format!("{path}: {e}")))?;
            SimConfig::from_json_str(&json)?
        }
        Err(_) => SimConfig::default(),
    };

    let mut game = MatchBuilder::new().config(config).demo_layout().build()?;
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    let mut commands = vec![(0.0, 0.0); game.players().len()];

    for t in 0..DEMO_TICKS {
        if t % COMMAND_PERIOD == 0 {
            let sensors = game.get_sensors();
            let ball_slot = game.config().flag_resolution * 4;
            for (command, readings) in commands.iter_mut().zip(&sensors) {
                // Chase straight when the ball is in view, otherwise wander
                *command = if is_sensed(readings[ball_slot]) {
                    (1.0, 0.0)
                } else {
                    (rng.random_range(0.2..1.0), rng.random_range(-2.0..2.0))
                };
            }
        }
        game.set_commands(&commands)?;
        game.tick();
    }

    let (left, right) = game.score();
    log::info!("Final score after {} ticks: {left} - {right}", game.ticks());
    println!("{}", game.snapshot().to_json()?);
    Ok(())
}
