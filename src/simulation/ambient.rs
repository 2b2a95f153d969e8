//! Birds and clouds drifting across the sky
//!
//! Neither interacts with traffic; both only move in daylight.

use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;

use super::layout::SceneLayout;
use super::types::{advance_phase, Point};

/// Vertical bobbing amplitude of a bird around the flight level
const BIRD_AMPLITUDE_Y: f32 = 15.0;

/// Horizontal distance past the right edge at which a bird re-enters left
const BIRD_WRAP_MARGIN: f32 = 50.0;

/// Per-tick drift of a cloud's puff shape animation
const CLOUD_SHAPE_RATE: f32 = 0.01;

/// Share of each puff's horizontal radius counted toward the cloud's width
const CLOUD_WIDTH_FACTOR: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimBird {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub flap_phase: f32,
    pub flap_speed: f32,
    pub bob_phase: f32,
}

impl SimBird {
    pub fn random<R: Rng>(layout: &SceneLayout, rng: &mut R) -> Self {
        Self {
            x: rng.random_range(0.0..=layout.width),
            y: layout.bird_base_y + rng.random_range(-BIRD_AMPLITUDE_Y..=BIRD_AMPLITUDE_Y),
            speed: rng.random_range(0.8..=1.8),
            flap_phase: rng.random_range(0.0..TAU),
            flap_speed: rng.random_range(0.15..=0.35),
            bob_phase: rng.random_range(0.0..TAU),
        }
    }

    pub fn update<R: Rng>(&mut self, layout: &SceneLayout, rng: &mut R) {
        self.x += self.speed;
        self.flap_phase = advance_phase(self.flap_phase, self.flap_speed);
        self.bob_phase += self.speed * 0.01;
        self.y = layout.bird_base_y + BIRD_AMPLITUDE_Y * self.bob_phase.sin();

        if self.x > layout.width + BIRD_WRAP_MARGIN {
            self.x = -BIRD_WRAP_MARGIN;
            self.y = layout.bird_base_y + rng.random_range(-BIRD_AMPLITUDE_Y..=BIRD_AMPLITUDE_Y);
            self.bob_phase = rng.random_range(0.0..TAU);
        }
    }
}

/// One ellipse of a cloud, relative to the cloud's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloudPuff {
    pub offset: Point,
    pub radius_x: f32,
    pub radius_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimCloud {
    pub position: Point,
    pub speed: f32,
    pub scale: f32,
    pub shape_phase: f32,
    /// Visibility in [0, 1], driven by the time of day
    pub alpha: f32,
    pub puffs: Vec<CloudPuff>,
}

impl SimCloud {
    pub fn random<R: Rng>(layout: &SceneLayout, rng: &mut R) -> Self {
        let puff_count = rng.random_range(3..=5);
        let mut total_width = 0.0;
        let mut puffs: Vec<CloudPuff> = (0..puff_count)
            .map(|_| {
                let puff = CloudPuff {
                    offset: Point::new(
                        total_width + rng.random_range(-5.0..=5.0),
                        rng.random_range(-8.0..=8.0),
                    ),
                    radius_x: rng.random_range(25.0..=40.0),
                    radius_y: rng.random_range(15.0..=30.0),
                };
                total_width += puff.radius_x * rng.random_range(0.6..=0.9);
                puff
            })
            .collect();
        for puff in &mut puffs {
            puff.offset.x -= total_width / 2.2;
        }

        Self {
            position: Point::new(
                rng.random_range(-layout.width * 0.2..=layout.width * 1.2),
                Self::random_height(layout, rng),
            ),
            speed: rng.random_range(0.1..=0.4),
            scale: rng.random_range(0.8..=1.6),
            shape_phase: rng.random_range(0.0..TAU),
            alpha: 0.0,
            puffs,
        }
    }

    fn random_height<R: Rng>(layout: &SceneLayout, rng: &mut R) -> f32 {
        layout.cloud_base_y + rng.random_range(-layout.height * 0.05..=layout.height * 0.1)
    }

    /// Rough horizontal extent used for wrapping
    pub fn approximate_width(&self) -> f32 {
        self.puffs
            .iter()
            .map(|puff| puff.radius_x * self.scale * CLOUD_WIDTH_FACTOR)
            .sum()
    }

    pub fn update<R: Rng>(&mut self, is_night: bool, alpha: f32, layout: &SceneLayout, rng: &mut R) {
        if !is_night {
            self.position.x += self.speed;
        }
        self.shape_phase = advance_phase(self.shape_phase, CLOUD_SHAPE_RATE);
        self.alpha = alpha.clamp(0.0, 1.0);

        let width = self.approximate_width();
        if self.position.x - width > layout.width {
            self.position.x = -width - rng.random_range(50.0..=150.0);
            self.position.y = Self::random_height(layout, rng);
        }
    }
}

/// Birds only appear if the scene starts in daylight
pub fn spawn_birds<R: Rng>(is_night: bool, layout: &SceneLayout, rng: &mut R) -> Vec<SimBird> {
    if is_night {
        return Vec::new();
    }
    let count = rng.random_range(3..=5);
    (0..count).map(|_| SimBird::random(layout, rng)).collect()
}

pub fn spawn_clouds<R: Rng>(count: usize, layout: &SceneLayout, rng: &mut R) -> Vec<SimCloud> {
    (0..count).map(|_| SimCloud::random(layout, rng)).collect()
}

pub fn update_birds<R: Rng>(birds: &mut [SimBird], is_night: bool, layout: &SceneLayout, rng: &mut R) {
    if is_night {
        return;
    }
    for bird in birds.iter_mut() {
        bird.update(layout, rng);
    }
}

pub fn update_clouds<R: Rng>(
    clouds: &mut [SimCloud],
    is_night: bool,
    alpha: f32,
    layout: &SceneLayout,
    rng: &mut R,
) {
    for cloud in clouds.iter_mut() {
        cloud.update(is_night, alpha, layout, rng);
    }
}
