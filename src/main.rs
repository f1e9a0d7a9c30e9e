//! Coin Runner entry point
//!
//! Headless driver: plays seeded sessions on the idle autopilot and logs
//! how each run went. Usage: `coin-runner [seed] [runs]`.

#[cfg(not(target_arch = "wasm32"))]
use coin_runner::{FixedStepRunner, GameConfig, sim::GamePhase};

/// Uneven frame deltas, as a browser or compositor would deliver them
#[cfg(not(target_arch = "wasm32"))]
const FRAME_PATTERN: [f32; 4] = [1.0 / 60.0, 1.0 / 58.0, 1.0 / 62.0, 1.0 / 30.0];

/// Give up on a run that outlives this many frames (about ten minutes)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES_PER_RUN: usize = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coin Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xC01D);
    let runs = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(3);

    let config = GameConfig::load_or_default();
    let mut runner = FixedStepRunner::new(config, seed);
    runner.set_idle_mode(true);

    for run in 1..=runs {
        runner.request_start();
        let mut frames = 0;
        for dt in FRAME_PATTERN.iter().cycle().take(MAX_FRAMES_PER_RUN) {
            runner.advance(*dt);
            frames += 1;
            if runner.state().phase == GamePhase::GameOver {
                break;
            }
        }

        let hud = runner.hud();
        if hud.phase == GamePhase::GameOver {
            log::info!(
                "Run {run}: {} coins, {} m in {frames} frames",
                hud.run_score,
                hud.distance
            );
        } else {
            log::warn!(
                "Run {run} still going after {frames} frames ({} coins, {} m), moving on",
                hud.run_score,
                hud.distance
            );
            break;
        }
    }

    match serde_json::to_string_pretty(runner.high_scores()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize high scores: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `FixedStepRunner` from their own frame callback
}
