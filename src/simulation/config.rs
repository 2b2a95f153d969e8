//! Initialisation settings for a simulation run

use anyhow::{ensure, Result};

/// Number of vehicles, alternating between the two lanes
pub const NUM_VEHICLES: usize = 8;
pub const NUM_SIDEWALK_PEDESTRIANS: usize = 10;
pub const NUM_CROSSING_PEDESTRIANS: usize = 6;
pub const NUM_CLOUDS: usize = 5;

/// Default window size
pub const DEFAULT_WIDTH: f32 = 1000.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;

/// Time of day the scene starts at (early morning)
pub const DEFAULT_START_TIME: f32 = 0.15;

/// Fraction of a day that passes per tick
pub const DEFAULT_TIME_RATE: f32 = 0.0001;

/// Settings consumed once when a world is built
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    pub vehicles: usize,
    pub sidewalk_pedestrians: usize,
    pub crossing_pedestrians: usize,
    pub clouds: usize,
    /// When false the clock is frozen and darkness is always 0
    pub day_night_cycle: bool,
    pub start_time: f32,
    pub time_rate: f32,
    /// Seed for reproducible runs; a fresh OS seed is used when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vehicles: NUM_VEHICLES,
            sidewalk_pedestrians: NUM_SIDEWALK_PEDESTRIANS,
            crossing_pedestrians: NUM_CROSSING_PEDESTRIANS,
            clouds: NUM_CLOUDS,
            day_night_cycle: true,
            start_time: DEFAULT_START_TIME,
            time_rate: DEFAULT_TIME_RATE,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject settings the simulation cannot start from
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width.is_finite() && self.width > 0.0,
            "window width must be positive, got {}",
            self.width
        );
        ensure!(
            self.height.is_finite() && self.height > 0.0,
            "window height must be positive, got {}",
            self.height
        );
        ensure!(
            (0.0..1.0).contains(&self.start_time),
            "start time must lie in [0, 1), got {}",
            self.start_time
        );
        ensure!(
            (0.0..1.0).contains(&self.time_rate),
            "time rate must lie in [0, 1), got {}",
            self.time_rate
        );
        Ok(())
    }
}
