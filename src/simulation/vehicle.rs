//! Vehicle kinematics for the street simulation
//!
//! Each tick a vehicle picks the lowest of three speed limits (its cruise
//! speed, what the signal allows, what the vehicle ahead allows) and moves
//! its current speed towards that target by a bounded step.

use rand::Rng;
use serde::Serialize;

use super::layout::{CrossingCorridor, SceneLayout};
use super::signal::{SignalPhase, SignalReading};
use super::types::{
    Color, Direction, VehicleId, VehicleKind, BRAKING_DISTANCE_SCALE, BRAKING_HORIZON_TICKS,
    CAR_ACCELERATION, CAR_DECELERATION, CAR_FOLLOWING_SPEED_FACTOR, CAR_MIN_SAFE_DISTANCE,
    CAR_TIME_PREDICTION_FACTOR, CORRIDOR_APPROACH_MARGIN, LATE_PHASE_RADIUS, LATE_PHASE_TICKS,
    PREDICTION_SPEED_FLOOR, STALL_SPEED, STOP_ZONE,
};

/// How far off-screen a vehicle travels before it is recycled
pub const EXIT_MARGIN: f32 = 50.0;

/// Result of a vehicle update indicating what should happen to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Continue,
    /// The vehicle is fully past the far edge and should be recycled
    LeftScene,
}

/// The nearest vehicle ahead in the same lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leader {
    /// Bumper-to-bumper distance
    pub gap: f32,
    pub speed: f32,
}

/// A vehicle in the street simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub direction: Direction,
    /// Left edge of the body
    pub x: f32,
    /// Lane centre
    pub y: f32,
    pub speed: f32,
    /// Personal cruise ceiling
    pub base_speed: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

impl SimVehicle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VehicleId,
        kind: VehicleKind,
        direction: Direction,
        x: f32,
        y: f32,
        speed: f32,
        base_speed: f32,
        color: Color,
    ) -> Self {
        let (width, height) = kind.dimensions();
        Self {
            id,
            kind,
            direction,
            x,
            y,
            speed,
            base_speed,
            width,
            height,
            color,
        }
    }

    /// A vehicle with a random kind, colour and cruise speed
    pub fn random<R: Rng>(
        id: VehicleId,
        direction: Direction,
        layout: &SceneLayout,
        rng: &mut R,
    ) -> Self {
        let kind = VehicleKind::random(rng);
        let base_speed = rng.random_range(kind.cruise_speed_range());
        let speed = base_speed * rng.random_range(0.5..=1.0);
        let color = Color::random(rng);
        Self::new(
            id,
            kind,
            direction,
            0.0,
            layout.lane_y(direction),
            speed,
            base_speed,
            color,
        )
    }

    /// Leading edge in the direction of travel
    pub fn front_edge(&self) -> f32 {
        match self.direction {
            Direction::Forward => self.x + self.width,
            Direction::Backward => self.x,
        }
    }

    /// Trailing edge in the direction of travel
    pub fn rear_edge(&self) -> f32 {
        match self.direction {
            Direction::Forward => self.x,
            Direction::Backward => self.x + self.width,
        }
    }

    /// Does this body overlap `[left, left + width]`
    pub fn overlaps_span(&self, left: f32, width: f32) -> bool {
        self.x < left + width && self.x + self.width > left
    }

    /// Whether the signal binds this vehicle to its stop line this tick
    pub fn should_stop_for_signal(&self, signal: &SignalReading, corridor: &CrossingCorridor) -> bool {
        if signal.must_stop {
            return true;
        }
        if signal.phase != SignalPhase::Green {
            return false;
        }

        let sign = self.direction.sign();
        let stop_line = corridor.stop_line(self.direction);
        let front = self.front_edge();
        let remaining = signal.remaining as f32;

        // Predict with at least a walking pace so the division stays sane
        let prediction_speed = self.base_speed.max(PREDICTION_SPEED_FLOOR);
        let distance_to_clear = match self.direction {
            Direction::Forward => corridor.back_edge - self.x,
            Direction::Backward => (self.x + self.width) - corridor.front_edge,
        };
        let time_to_clear = distance_to_clear.abs() / prediction_speed;

        let decision_point = stop_line - sign * prediction_speed * BRAKING_HORIZON_TICKS;
        let past_decision_point = (front - decision_point) * sign > 0.0;
        let cannot_clear = time_to_clear * CAR_TIME_PREDICTION_FACTOR > remaining;

        let phase_ending_nearby =
            signal.remaining < LATE_PHASE_TICKS && (front - stop_line).abs() < LATE_PHASE_RADIUS;

        (cannot_clear && past_decision_point) || phase_ending_nearby
    }

    /// Speed ceiling imposed by the signal
    pub fn signal_speed_limit(&self, signal: &SignalReading, corridor: &CrossingCorridor) -> f32 {
        if !self.should_stop_for_signal(signal, corridor) {
            return self.base_speed;
        }

        let sign = self.direction.sign();
        let stop_line = corridor.stop_line(self.direction);
        let front = self.front_edge();
        let distance_to_stop = (stop_line - front).abs();
        let before_stop_line = (stop_line - front) * sign > 0.0;

        let mut limit = self.base_speed;
        if !before_stop_line && distance_to_stop < STOP_ZONE {
            limit = 0.0;
        } else if before_stop_line {
            let brake = (distance_to_stop / BRAKING_DISTANCE_SCALE).clamp(0.0, 1.0);
            limit = limit.min(self.base_speed * brake * brake).max(0.0);
        } else if self.speed < STALL_SPEED {
            limit = 0.0;
        }

        // Never come to rest astride the corridor. Forward traffic projects its
        // body one length ahead; backward traffic only checks its front, so it
        // brakes all the way down to its stop line
        let front_near_corridor = match self.direction {
            Direction::Forward => {
                front + self.width >= corridor.front_edge - CORRIDOR_APPROACH_MARGIN
            }
            Direction::Backward => front <= corridor.back_edge + CORRIDOR_APPROACH_MARGIN,
        };
        let rear_before_cleared = match self.direction {
            Direction::Forward => self.x < corridor.back_edge,
            Direction::Backward => self.x + self.width > corridor.front_edge,
        };
        if before_stop_line && front_near_corridor && rear_before_cleared {
            limit = 0.0;
        }

        limit
    }

    /// Speed ceiling imposed by the vehicle ahead
    pub fn following_speed_limit(&self, leader: Option<Leader>) -> f32 {
        let unconstrained = self.base_speed * 1.5;
        let Some(leader) = leader else {
            return unconstrained;
        };

        let safe_distance = CAR_MIN_SAFE_DISTANCE + self.speed * CAR_FOLLOWING_SPEED_FACTOR;
        if leader.gap >= safe_distance {
            return unconstrained;
        }

        let limit = if leader.gap < CAR_MIN_SAFE_DISTANCE {
            (leader.speed * 0.8).min(self.speed * 0.5)
        } else {
            leader.speed
        };
        limit.max(0.0)
    }

    /// Lowest of the cruise, signal and following limits
    pub fn target_speed(
        &self,
        signal: &SignalReading,
        corridor: &CrossingCorridor,
        leader: Option<Leader>,
    ) -> f32 {
        self.base_speed
            .min(self.signal_speed_limit(signal, corridor))
            .min(self.following_speed_limit(leader))
    }

    /// Step the current speed towards `target`, braking harder than accelerating
    pub fn approach_speed(&mut self, target: f32) {
        if self.speed < target {
            self.speed = target.min(self.speed + CAR_ACCELERATION);
        } else if self.speed > target {
            self.speed = target.max(self.speed - CAR_DECELERATION);
        }
        self.speed = self.speed.max(0.0);
    }

    /// Full per-tick update: choose a target, adjust speed, move
    pub fn update(
        &mut self,
        signal: &SignalReading,
        layout: &SceneLayout,
        leader: Option<Leader>,
    ) -> VehicleUpdateResult {
        let target = self.target_speed(signal, &layout.corridor, leader);
        self.approach_speed(target);
        self.x += self.speed * self.direction.sign();

        if self.has_left_scene(layout.width) {
            VehicleUpdateResult::LeftScene
        } else {
            VehicleUpdateResult::Continue
        }
    }

    pub fn has_left_scene(&self, scene_width: f32) -> bool {
        match self.direction {
            Direction::Forward => self.x > scene_width + EXIT_MARGIN,
            Direction::Backward => self.x + self.width < -EXIT_MARGIN,
        }
    }

    /// Reinitialise in place beyond the entry edge with fresh attributes
    pub fn recycle<R: Rng>(&mut self, layout: &SceneLayout, rng: &mut R) {
        let was_moving = self.speed > STALL_SPEED;

        self.kind = VehicleKind::random(rng);
        let (width, height) = self.kind.dimensions();
        self.width = width;
        self.height = height;
        self.color = Color::random(rng);
        self.base_speed = rng.random_range(self.kind.cruise_speed_range());
        self.speed = if was_moving {
            self.base_speed * rng.random_range(0.5..=0.8)
        } else {
            0.0
        };

        let lead_in = rng.random_range(150.0..=400.0);
        self.y = layout.lane_y(self.direction);
        self.x = match self.direction {
            Direction::Forward => -self.width - lead_in,
            Direction::Backward => layout.width + EXIT_MARGIN + lead_in,
        };
    }
}
