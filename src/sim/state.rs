//! Game state and core simulation types
//!
//! Everything the step mutates lives in `SimulationState`. Hosts only ever
//! see it through the read-only views in `snapshot`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::lifecycle;
use super::terrain;
use crate::config::GameConfig;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start signal
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub grounded: bool,
    /// Jumps consumed since the last landing (0..=MAX_JUMPS)
    pub jumps_used: u8,
    /// Platform the player is standing on, if grounded
    pub support: Option<u32>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            vy: 0.0,
            grounded: false,
            jumps_used: 0,
            support: None,
        }
    }
}

impl Player {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Bottom-center point
    #[inline]
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    /// Snap onto a platform top and refill jumps
    pub fn land_on(&mut self, platform: &Platform) {
        self.pos.y = platform.rect.y - self.size.y;
        self.vy = 0.0;
        self.grounded = true;
        self.jumps_used = 0;
        self.support = Some(platform.id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// The full-width starting floor
    Ground,
    /// Generated terrain
    Floating,
}

/// A solid platform. Only its top surface is landable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    pub rect: Rect,
}

/// Coin values
pub const COIN_VALUE: u32 = 1;
pub const BONUS_COIN_VALUE: u32 = 5;

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
    pub collected: bool,
    pub value: u32,
}

impl Coin {
    pub fn new(id: u32, x: f32, y: f32, value: u32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, COIN_SIZE, COIN_SIZE),
            collected: false,
            value,
        }
    }
}

/// What spawned a particle (drives its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    CoinSpark,
    JumpPuff,
}

impl ParticleKind {
    /// 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            ParticleKind::CoinSpark => 0xfbbf24,
            ParticleKind::JumpPuff => 0xffffff,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// Counts down by PARTICLE_DECAY per tick; removed at <= 0
    pub life: f32,
    pub size: f32,
}

/// Complete simulation state, owned by the step
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Ascending by x; append at the tail, evict from the head
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub particles: Vec<Particle>,
    /// World x of the viewport's left edge
    pub camera_x: f32,
    /// Total distance traveled this run
    pub distance: f32,
    /// Current forward speed (per tick)
    pub speed: f32,
    /// Coins collected this run
    pub score: u32,
    /// Best score this session
    pub best_score: u32,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Create a new state in the Start phase, already laid out for play
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            player: Player::default(),
            platforms: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            camera_x: 0.0,
            distance: 0.0,
            speed: config.speed_base,
            score: 0,
            best_score: 0,
            time_ticks: 0,
            next_id: 1,
        };
        state.reset_run();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Begin (or restart) a run. Best score and the RNG stream carry over.
    pub fn start(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {}, best {})", self.seed, self.best_score);
    }

    fn reset_run(&mut self) {
        self.next_id = 1;
        self.player = Player::default();
        let ground_id = self.next_entity_id();
        self.platforms = terrain::initial_platforms(ground_id);
        self.coins.clear();
        self.particles.clear();
        self.speed = self.config.speed_base;
        self.distance = 0.0;
        self.camera_x = 0.0;
        self.score = 0;
        self.time_ticks = 0;
    }

    /// Jump request. Grounded: full jump. Airborne with a jump left: weaker
    /// second jump plus a puff. Anything else is ignored.
    pub fn jump(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if self.player.grounded {
            self.player.vy = self.config.jump_force;
            self.player.grounded = false;
            self.player.support = None;
            self.player.jumps_used = 1;
        } else if self.player.jumps_used < MAX_JUMPS {
            self.player.vy = self.config.jump_force * DOUBLE_JUMP_FACTOR;
            self.player.jumps_used += 1;
            let feet = self.player.feet();
            self.particles.extend(lifecycle::jump_puff(feet));
        }
    }

    /// Difficulty scalar driving terrain variance
    #[inline]
    pub fn difficulty(&self) -> f32 {
        self.distance / DIFFICULTY_DISTANCE
    }

    /// Distance in displayed meters
    #[inline]
    pub fn distance_meters(&self) -> u32 {
        (self.distance / UNITS_PER_METER).floor() as u32
    }
}
