//! Physics tuning
//!
//! Loaded from JSON at startup; immutable for the rest of the session.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default config path, overridable with `COIN_RUNNER_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "config/coin_runner.json";
const CONFIG_PATH_ENV: &str = "COIN_RUNNER_CONFIG";

/// Fraction of the flat air-time distance the generator will ask the player to clear
pub const REACTION_MARGIN: f32 = 0.9;
/// Smallest gap the generator ever produces
pub const ABSOLUTE_MIN_GAP: f32 = 80.0;

/// Errors from loading or validating a config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Physics constants for one session.
///
/// Units are logical pixels and ticks; y grows downward, so `jump_force`
/// is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub speed_base: f32,
    pub speed_max: f32,
    /// Forward speed gained per tick
    pub acceleration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_force: -16.0,
            speed_base: 8.0,
            speed_max: 30.0,
            acceleration: 0.005,
        }
    }
}

/// How far a single grounded jump can carry the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachLimits {
    /// Apex height of a grounded jump
    pub max_jump_height: f32,
    /// Ticks from takeoff back to takeoff height
    pub air_time: f32,
}

impl ReachLimits {
    /// Largest gap the generator may place at `speed` on level ground
    #[inline]
    pub fn max_flat_gap(&self, speed: f32) -> f32 {
        speed * self.air_time * REACTION_MARGIN
    }
}

impl GameConfig {
    /// Jump reach implied by gravity and jump force
    pub fn reach(&self) -> ReachLimits {
        ReachLimits {
            max_jump_height: self.jump_force * self.jump_force / (2.0 * self.gravity),
            air_time: 2.0 * self.jump_force.abs() / self.gravity,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.gravity,
            self.jump_force,
            self.speed_base,
            self.speed_max,
            self.acceleration,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid("values must be finite".into()));
        }
        if self.gravity <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        if self.jump_force >= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "jump_force must be negative (upward), got {}",
                self.jump_force
            )));
        }
        if self.speed_base <= 0.0 || self.speed_max < self.speed_base {
            return Err(ConfigError::Invalid(format!(
                "need 0 < speed_base <= speed_max, got {} and {}",
                self.speed_base, self.speed_max
            )));
        }
        if self.acceleration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "acceleration must not be negative, got {}",
                self.acceleration
            )));
        }
        let flat_gap = self.reach().max_flat_gap(self.speed_base);
        if flat_gap < ABSOLUTE_MIN_GAP {
            return Err(ConfigError::Invalid(format!(
                "a jump at speed_base covers {flat_gap:.1}, below the minimum gap of {ABSOLUTE_MIN_GAP}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from `COIN_RUNNER_CONFIG` (or the default path), falling back to
    /// defaults if the file is missing or bad.
    pub fn load_or_default() -> Self {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {path}, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {path}: {e}");
                Self::default()
            }
        }
    }
}
