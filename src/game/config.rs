use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::grid::Grid;

/// Configuration for the game
///
/// Every field has a default, so a JSON override file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    /// Ticks per second at the start of a round
    pub initial_speed: f32,
    /// Speed gained per food eaten
    pub speed_step: f32,
    /// Speed never exceeds this
    pub max_speed: f32,
    /// Score gained per food eaten
    pub food_score: u32,

    /// How long the intro screen stays up without input
    pub intro_duration_ms: u64,
    /// Number of leaderboard rows shown
    pub leaderboard_size: usize,
    /// Random samples tried before food placement scans for free cells
    pub food_max_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 25,
            initial_speed: 10.0,
            speed_step: 0.5,
            max_speed: 20.0,
            food_score: 10,
            intro_duration_ms: 4000,
            leaderboard_size: 5,
            food_max_attempts: 256,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load overrides from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Milliseconds between moves at `speed` ticks per second
    pub fn tick_interval_ms(speed: f32) -> f32 {
        1000.0 / speed
    }

    /// Validate the configuration
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            bail!(
                "grid must be non-empty, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            bail!("grid is too large");
        }
        if !(self.initial_speed > 0.0) {
            bail!("initial_speed must be positive, got {}", self.initial_speed);
        }
        if !(self.speed_step >= 0.0) {
            bail!("speed_step must be non-negative, got {}", self.speed_step);
        }
        if !(self.max_speed >= self.initial_speed) {
            bail!(
                "max_speed ({}) must be at least initial_speed ({})",
                self.max_speed,
                self.initial_speed
            );
        }
        if self.leaderboard_size == 0 {
            bail!("leaderboard_size must be greater than 0");
        }
        if self.food_max_attempts == 0 {
            bail!("food_max_attempts must be greater than 0");
        }
        Ok(())
    }
}
