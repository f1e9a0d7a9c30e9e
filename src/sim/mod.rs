//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Platforms kept in ascending x order
//! - No rendering or platform dependencies

pub mod collision;
pub mod lifecycle;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Rect, intersects};
pub use snapshot::{FrameView, HudView};
pub use state::{
    BONUS_COIN_VALUE, COIN_VALUE, Coin, GamePhase, Particle, ParticleKind, Platform, PlatformKind,
    Player, SimulationState,
};
pub use terrain::{CoinPattern, CoinSpawn, Segment, generate_next, initial_platforms};
pub use tick::{TickInput, step, tick};
