//! Read-only views for renderers and HUDs
//!
//! Hosts never touch `SimulationState` directly between ticks; they borrow
//! one of these instead. Both serialize, so a host on the far side of an
//! FFI or IPC boundary can take them as JSON.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::state::{Coin, GamePhase, Particle, Platform, SimulationState};
use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Everything needed to paint one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameView<'a> {
    pub player: Rect,
    pub platforms: &'a [Platform],
    pub coins: &'a [Coin],
    pub particles: &'a [Particle],
    pub camera_x: f32,
    /// Logical viewport size
    pub viewport: Vec2,
}

impl FrameView<'_> {
    /// World x to viewport x
    #[inline]
    pub fn to_screen_x(&self, world_x: f32) -> f32 {
        world_x - self.camera_x
    }

    /// Platforms overlapping the viewport
    pub fn visible_platforms(&self) -> impl Iterator<Item = &Platform> {
        let left = self.camera_x;
        let right = self.camera_x + self.viewport.x;
        self.platforms
            .iter()
            .filter(move |p| p.rect.right() > left && p.rect.x < right)
    }

    /// Uncollected coins (collected ones stay in the list until evicted)
    pub fn live_coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter().filter(|c| !c.collected)
    }
}

/// Score readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub run_score: u32,
    pub best_score: u32,
    /// Distance in meters
    pub distance: u32,
}

impl SimulationState {
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            player: self.player.rect(),
            platforms: &self.platforms,
            coins: &self.coins,
            particles: &self.particles,
            camera_x: self.camera_x,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        }
    }

    pub fn hud(&self) -> HudView {
        HudView {
            phase: self.phase,
            run_score: self.score,
            best_score: self.best_score,
            distance: self.distance_meters(),
        }
    }
}
