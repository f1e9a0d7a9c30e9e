//! Fixed timestep simulation tick
//!
//! One call advances the run by one display frame. There is no delta-time:
//! every constant in `GameConfig` is per tick.
//!
//! Landing uses the pre-step bottom edge (`bottom - vy`) as a cheap stand-in
//! for a swept test. A thin platform can still be tunnelled through when
//! `vy` exceeds its thickness plus `LANDING_TOLERANCE`.

use super::collision::intersects;
use super::lifecycle;
use super::state::{GamePhase, SimulationState};
use crate::consts::*;

/// Idle mode jumps this many ticks of travel before the platform edge
const IDLE_LEAD_TICKS: f32 = 2.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start or restart (ignored while playing)
    pub start: bool,
    /// Jump (space/up/click/tap)
    pub jump: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Apply one frame of input and advance the simulation
pub fn tick(state: &mut SimulationState, input: &TickInput) {
    if input.start && state.phase != GamePhase::Playing {
        state.start();
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if input.jump || (input.idle_mode && idle_wants_jump(state)) {
        state.jump();
    }

    step(state);
}

/// Advance one tick. Does nothing outside `Playing`.
pub fn step(state: &mut SimulationState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // Speed ramp
    state.speed = (state.speed + state.config.acceleration).min(state.config.speed_max);
    state.distance += state.speed;

    // Forward motion and camera follow
    state.player.pos.x += state.speed;
    state.camera_x = state.player.pos.x - CAMERA_OFFSET;

    // Gravity
    state.player.vy += state.config.gravity;
    state.player.pos.y += state.player.vy;

    resolve_landing(state);

    if state.player.pos.y > VIEWPORT_HEIGHT + PIT_MARGIN {
        game_over(state);
        return;
    }

    collect_coins(state);
    lifecycle::maintain(state);
}

/// Land on the first nearby platform the player dropped onto this tick
fn resolve_landing(state: &mut SimulationState) {
    let player = &mut state.player;
    player.grounded = false;
    player.support = None;

    let body = player.rect();
    let near_left = body.x - COLLISION_NEIGHBORHOOD;
    let near_right = body.right() + COLLISION_NEIGHBORHOOD;

    // Right edges ascend with x, so the neighborhood is a contiguous run
    let first = state
        .platforms
        .partition_point(|p| p.rect.right() <= near_left);

    for platform in state.platforms[first..]
        .iter()
        .take_while(|p| p.rect.x < near_right)
    {
        if !intersects(&body, &platform.rect) {
            continue;
        }
        let prev_bottom = body.bottom() - player.vy;
        if player.vy > 0.0 && prev_bottom <= platform.rect.y + LANDING_TOLERANCE {
            player.land_on(platform);
            break;
        }
    }
}

/// Collect every overlapped coin. Returns the points gained.
fn collect_coins(state: &mut SimulationState) -> u32 {
    let body = state.player.rect();
    let mut gained = 0;
    let mut bursts = Vec::new();

    for coin in state.coins.iter_mut().filter(|c| !c.collected) {
        if intersects(&body, &coin.rect) {
            coin.collected = true;
            gained += coin.value;
            bursts.push(coin.rect.center());
        }
    }

    state.score += gained;
    for center in bursts {
        let sparks = lifecycle::coin_burst(center, state.rng_mut());
        state.particles.extend(sparks);
    }
    gained
}

fn game_over(state: &mut SimulationState) {
    state.phase = GamePhase::GameOver;
    state.best_score = state.best_score.max(state.score);
    log::info!(
        "Game over: {} coins, {}m after {} ticks (best {})",
        state.score,
        state.distance_meters(),
        state.time_ticks,
        state.best_score
    );
}

/// Autopilot: jump near the end of the current platform, and spend the
/// second jump when falling with nothing underneath.
fn idle_wants_jump(state: &SimulationState) -> bool {
    let player = &state.player;
    let body = player.rect();

    if player.grounded {
        return state
            .platforms
            .iter()
            .find(|p| Some(p.id) == player.support)
            .is_some_and(|p| p.rect.right() - body.right() < state.speed * IDLE_LEAD_TICKS);
    }

    if player.vy <= 0.0 || player.jumps_used >= MAX_JUMPS {
        return false;
    }

    let has_floor = state.platforms.iter().any(|p| {
        p.rect.x < body.right() && p.rect.right() > body.x && p.rect.y >= body.bottom()
    });
    !has_floor
}
