//! Time-of-day clock driving the day/night cycle

use std::f32::consts::PI;

use super::types::{DAWN_DURATION, DUSK_DURATION, NIGHT_END_TIME, NIGHT_START_TIME};

/// Normalised time of day in [0, 1), advanced by a fixed amount per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentClock {
    time: f32,
    rate: f32,
    enabled: bool,
}

impl EnvironmentClock {
    pub fn new(start_time: f32, rate: f32, enabled: bool) -> Self {
        Self {
            time: start_time.rem_euclid(1.0),
            rate,
            enabled,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_cycle_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance by one tick's worth of the configured rate
    pub fn tick(&mut self) {
        if self.enabled {
            self.advance(self.rate);
        }
    }

    /// Add `dt` to the time of day, wrapping past midnight
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        if self.time >= 1.0 {
            self.time = (self.time - 1.0).rem_euclid(1.0);
        }
    }

    /// 0 at solar noon, rising towards the horizon and saturating at 1
    pub fn darkness(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        darkness_at(self.time)
    }

    /// A frozen clock is permanently in daylight
    pub fn is_night(&self) -> bool {
        self.enabled && is_night_at(self.time)
    }

    /// Visibility of daytime-only scenery such as clouds
    pub fn daylight_alpha(&self) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        daylight_alpha_at(self.time)
    }
}

pub fn darkness_at(time: f32) -> f32 {
    let sun_height = (time * PI).sin().max(0.0);
    ((1.0 - sun_height).max(0.0) * 1.5).min(1.0)
}

pub fn is_night_at(time: f32) -> bool {
    time >= NIGHT_START_TIME || time <= NIGHT_END_TIME
}

/// Fades in over the dawn window, holds at 1 through the day and fades out
/// over the dusk window
pub fn daylight_alpha_at(time: f32) -> f32 {
    let dawn_end = NIGHT_END_TIME + DAWN_DURATION;
    let dusk_start = NIGHT_START_TIME - DUSK_DURATION;

    let alpha = if time > NIGHT_END_TIME && time < dawn_end {
        (time - NIGHT_END_TIME) / DAWN_DURATION
    } else if time > dusk_start && time < NIGHT_START_TIME {
        1.0 - (time - dusk_start) / DUSK_DURATION
    } else if time >= dawn_end && time <= dusk_start {
        1.0
    } else {
        0.0
    };
    alpha.clamp(0.0, 1.0)
}
