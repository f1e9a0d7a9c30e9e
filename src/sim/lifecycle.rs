//! Entity spawn and cull
//!
//! Terrain is appended ahead of the camera and evicted behind it in
//! batches. Platforms stay sorted by x, so eviction only ever drains a
//! prefix of the list.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Particle, ParticleKind, Platform, PlatformKind, SimulationState};
use super::terrain::{self, Segment};
use crate::consts::*;

const SPARK_LIFE: f32 = 1.0;
const SPARK_SIZE: f32 = 5.0;
const SPARK_MIN_SPEED: f32 = 2.0;
const SPARK_MAX_SPEED: f32 = 6.0;
const PUFF_LIFE: f32 = 0.5;
const PUFF_SIZE: f32 = 6.0;

/// Per-tick upkeep: generate, evict, age particles
pub fn maintain(state: &mut SimulationState) {
    extend_terrain(state);
    evict_behind(state);
    update_particles(&mut state.particles);
}

/// Append segments until the tail reaches past the look-ahead horizon.
/// Returns how many platforms were added.
pub fn extend_terrain(state: &mut SimulationState) -> usize {
    let horizon = state.camera_x + VIEWPORT_WIDTH + LOOKAHEAD_MARGIN;
    let mut spawned = 0;

    loop {
        let Some(tail) = state.platforms.last() else {
            break;
        };
        if tail.rect.right() >= horizon {
            break;
        }

        let tail = tail.rect;
        let difficulty = state.difficulty();
        let speed = state.speed;
        let config = state.config;
        let segment = terrain::generate_next(&tail, difficulty, speed, &config, state.rng_mut());
        spawn_segment(state, segment);
        spawned += 1;
    }

    spawned
}

fn spawn_segment(state: &mut SimulationState, segment: Segment) {
    let id = state.next_entity_id();
    log::debug!(
        "Platform {id} at x={:.0} y={:.0} w={:.0} (gap {:.0}/{:.0}, {} coins)",
        segment.platform.x,
        segment.platform.y,
        segment.platform.w,
        segment.gap,
        segment.max_gap,
        segment.coins.len()
    );
    state.platforms.push(Platform {
        id,
        kind: PlatformKind::Floating,
        rect: segment.platform,
    });

    for spawn in segment.coins {
        let id = state.next_entity_id();
        state
            .coins
            .push(Coin::new(id, spawn.pos.x, spawn.pos.y, spawn.value));
    }
}

/// Drop platforms and coins that scrolled well past the camera, once the
/// platform list is over capacity. The tail and the player's support are
/// always kept. Returns how many platforms were removed.
pub fn evict_behind(state: &mut SimulationState) -> usize {
    if state.platforms.len() <= PLATFORM_CAPACITY {
        return 0;
    }

    let cutoff = state.camera_x - EVICT_MARGIN;
    let support = state.player.support;
    let keep_tail = state.platforms.len() - 1;
    let stale = state.platforms[..keep_tail]
        .iter()
        .take_while(|p| p.rect.right() <= cutoff && Some(p.id) != support)
        .count();

    state.platforms.drain(..stale);
    let coins_before = state.coins.len();
    state.coins.retain(|c| c.rect.right() > cutoff);

    if stale > 0 {
        log::debug!(
            "Evicted {stale} platforms and {} coins behind x={cutoff:.0}",
            coins_before - state.coins.len()
        );
    }
    stale
}

/// Move particles and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Radial spark burst for a collected coin
pub fn coin_burst(center: Vec2, rng: &mut impl Rng) -> Vec<Particle> {
    let step = std::f32::consts::TAU / COIN_BURST_COUNT as f32;
    (0..COIN_BURST_COUNT)
        .map(|i| {
            let jitter = rng.random_range(-0.5f32..0.5) * step;
            let angle = i as f32 * step + jitter;
            let speed = rng.random_range(SPARK_MIN_SPEED..SPARK_MAX_SPEED);
            Particle {
                pos: center,
                vel: Vec2::from_angle(angle) * speed,
                kind: ParticleKind::CoinSpark,
                life: SPARK_LIFE,
                size: SPARK_SIZE,
            }
        })
        .collect()
}

/// Two-particle puff under the player's feet for a mid-air jump
pub fn jump_puff(feet: Vec2) -> [Particle; 2] {
    let puff = |vx: f32| Particle {
        pos: feet,
        vel: Vec2::new(vx, 2.0),
        kind: ParticleKind::JumpPuff,
        life: PUFF_LIFE,
        size: PUFF_SIZE,
    };
    [puff(-2.0), puff(2.0)]
}
