//! Coin Runner - An endless side-scrolling platform runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, terrain generation, entity lifecycle)
//! - `runner`: Fixed-timestep frame driver and input routing
//! - `config`: Data-driven physics tuning
//! - `highscores`: In-session run leaderboard

pub mod config;
pub mod highscores;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::HighScores;
pub use runner::FixedStepRunner;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the runner will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Logical viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1200.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = VIEWPORT_HEIGHT - 300.0;
    /// Player sits this far right of the camera's left edge
    pub const CAMERA_OFFSET: f32 = 200.0;

    /// Second jump is weaker than the grounded one
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;
    /// Jumps available between landings
    pub const MAX_JUMPS: u8 = 2;

    /// Terrain
    pub const GROUND_HEIGHT: f32 = 100.0;
    pub const PLATFORM_THICKNESS: f32 = 50.0;
    pub const COIN_SIZE: f32 = 30.0;

    /// Landing accepted if the pre-step bottom was at most this far below the top
    pub const LANDING_TOLERANCE: f32 = 15.0;
    /// Horizontal slack around the player when gathering landing candidates
    pub const COLLISION_NEIGHBORHOOD: f32 = 100.0;
    /// Falling this far below the viewport ends the run
    pub const PIT_MARGIN: f32 = 100.0;

    /// New terrain is generated until it reaches this far past the viewport
    pub const LOOKAHEAD_MARGIN: f32 = 200.0;
    /// Entities this far behind the camera are eligible for eviction
    pub const EVICT_MARGIN: f32 = 200.0;
    /// Eviction runs once the platform list grows past this length
    pub const PLATFORM_CAPACITY: usize = 20;

    /// Particle life lost per tick
    pub const PARTICLE_DECAY: f32 = 0.05;
    pub const COIN_BURST_COUNT: usize = 8;

    /// Distance units per unit of difficulty
    pub const DIFFICULTY_DISTANCE: f32 = 3000.0;
    /// Distance units per displayed meter
    pub const UNITS_PER_METER: f32 = 10.0;
}
