//! Fixed-timestep frame driver
//!
//! Hosts call `advance` once per rendered frame with the wall-clock delta.
//! The runner accumulates it and runs whole `SIM_DT` ticks, so physics
//! stays tied to the tick count no matter how uneven the frame callback is.

use crate::config::GameConfig;
use crate::consts::*;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::sim::{FrameView, GamePhase, HudView, SimulationState, TickInput, tick};

/// Game session: simulation state plus the frame loop around it
pub struct FixedStepRunner {
    state: SimulationState,
    accumulator: f32,
    input: TickInput,
    high_scores: HighScores,
    last_phase: GamePhase,
}

impl FixedStepRunner {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        log::info!("Session created with seed {seed}");
        Self {
            state: SimulationState::new(config, seed),
            accumulator: 0.0,
            input: TickInput::default(),
            high_scores: HighScores::new(),
            last_phase: GamePhase::Start,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        self.state.frame_view()
    }

    pub fn hud(&self) -> HudView {
        self.state.hud()
    }

    /// Queue a jump for the next tick. Ignored unless playing.
    pub fn request_jump(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.jump = true;
        }
    }

    /// Queue a start/restart. Ignored while playing.
    pub fn request_start(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.input.start = true;
        }
    }

    /// Toggle the autopilot
    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    /// Run simulation ticks for `dt` seconds of wall-clock time.
    /// Returns how many ticks ran.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.start = false;

            self.track_phase();
        }

        // Drop backlog we refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        substeps
    }

    /// Record the run on the transition into GameOver
    fn track_phase(&mut self) {
        let current = self.state.phase;
        if current == self.last_phase {
            return;
        }

        if current == GamePhase::GameOver {
            let rank = self.high_scores.record(HighScoreEntry {
                score: self.state.score,
                distance: self.state.distance_meters(),
                ticks: self.state.time_ticks,
            });
            if let Some(rank) = rank {
                log::info!("Run placed #{rank} this session");
            }
        }
        self.last_phase = current;
    }
}
