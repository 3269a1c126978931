//! Gravity Pong headless driver
//!
//! Plays an AI-vs-AI match at 60 Hz and prints the final snapshot as JSON.
//!
//! Usage: `gravity-pong [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use gravity_pong::Tuning;
    use gravity_pong::consts::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, FRAME_DT};
    use gravity_pong::sim::{GameEvent, GameState, TickInput, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Give up on matches that run longer than this (simulated seconds)
    const MAX_MATCH_SECONDS: f32 = 30.0 * 60.0;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => rand::random(),
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        log::info!("Gravity Pong (headless) starting with seed {}", seed);
        log::debug!("Tuning: {}", tuning.to_json()?);

        let mut state = GameState::with_rng(
            tuning,
            DEFAULT_BOARD_WIDTH,
            DEFAULT_BOARD_HEIGHT,
            Pcg32::seed_from_u64(seed),
        );
        let input = TickInput::ai_vs_ai();
        let max_ticks = (MAX_MATCH_SECONDS / FRAME_DT) as u64;

        while !state.matches.is_finished() && state.time_ticks < max_ticks {
            tick(&mut state, &input, FRAME_DT);
            for event in &state.events {
                match event {
                    GameEvent::PaddleHit { .. } | GameEvent::BallReleased => {
                        log::trace!("{:.2}s {:?}", state.clock, event)
                    }
                    _ => log::debug!("{:.2}s {:?}", state.clock, event),
                }
            }
        }

        match state.matches.winner() {
            Some(winner) => log::info!(
                "{:?} won after {:.1}s ({} ticks)",
                winner,
                state.clock,
                state.time_ticks
            ),
            None => log::warn!("Match still running after {} ticks, stopping", state.time_ticks),
        }

        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive the simulation directly; nothing to run here
}
