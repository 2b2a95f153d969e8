//! Core types and tuning constants for the street simulation
//!
//! Durations are in ticks, distances in scene units and speeds in units/tick.

use rand::Rng;
use serde::Serialize;
use std::ops::RangeInclusive;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VehicleId(pub SimId);

/// A wrapper type for pedestrian IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PedestrianId(pub SimId);

/// Type of vehicle in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleKind {
    Car,
    Bus,
    Truck,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 3] = [VehicleKind::Car, VehicleKind::Bus, VehicleKind::Truck];

    /// Body (width, height) in scene units
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            VehicleKind::Car => (60.0, 25.0),
            VehicleKind::Bus => (100.0, 40.0),
            VehicleKind::Truck => (120.0, 45.0),
        }
    }

    /// Range the personal cruise speed is drawn from
    pub fn cruise_speed_range(self) -> RangeInclusive<f32> {
        match self {
            VehicleKind::Car => 0.8..=1.6,
            VehicleKind::Bus => 0.6..=1.0,
            VehicleKind::Truck => 0.5..=0.9,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Direction of travel along the road axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Travelling towards increasing x (lane 1)
    Forward,
    /// Travelling towards decreasing x (lane 2)
    Backward,
}

impl Direction {
    /// +1.0 or -1.0
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Which sidewalk a pedestrian is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathSide {
    Upper,
    Lower,
}

impl PathSide {
    pub fn opposite(self) -> Self {
        match self {
            PathSide::Upper => PathSide::Lower,
            PathSide::Lower => PathSide::Upper,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PathSide::Upper
        } else {
            PathSide::Lower
        }
    }
}

/// An RGB colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Mid-saturation colour used for vehicle bodies and clothing
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(0.2..=0.9),
            g: rng.random_range(0.2..=0.9),
            b: rng.random_range(0.2..=0.9),
        }
    }
}

/// A 2D position in scene units (y grows upwards)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Move `current` towards `target` by at most `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        return target;
    }
    if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}

/// Advance a phase angle and wrap it back into [0, 2π]
pub fn advance_phase(phase: f32, delta: f32) -> f32 {
    let next = phase + delta;
    if next > std::f32::consts::TAU {
        next - std::f32::consts::TAU
    } else {
        next
    }
}

/// Real-time interval between ticks when paced by a host
pub const TICK_INTERVAL_MS: u64 = 16;

/// Signal phase lengths
pub const GREEN_DURATION: u32 = 500;
pub const YELLOW_DURATION: u32 = 50;
pub const RED_DURATION: u32 = 250;

/// Time-of-day window considered night (wraps through midnight)
pub const NIGHT_START_TIME: f32 = 0.65;
pub const NIGHT_END_TIME: f32 = 0.18;

/// Cloud fade windows either side of the night window
pub const DAWN_DURATION: f32 = 0.1;
pub const DUSK_DURATION: f32 = 0.1;

/// Bumper gap kept to the vehicle ahead when stationary
pub const CAR_MIN_SAFE_DISTANCE: f32 = 25.0;

/// Extra following gap per unit of own speed
pub const CAR_FOLLOWING_SPEED_FACTOR: f32 = 5.0;

/// Per-tick speed change limits
pub const CAR_ACCELERATION: f32 = 0.04;
pub const CAR_DECELERATION: f32 = 0.08;

/// Safety margin on the time a vehicle needs to clear the corridor
pub const CAR_TIME_PREDICTION_FACTOR: f32 = 1.15;

/// Floor on the speed used to predict corridor clearance
pub const PREDICTION_SPEED_FLOOR: f32 = 0.5;

/// Ticks of travel at prediction speed between decision point and stop line
pub const BRAKING_HORIZON_TICKS: f32 = 60.0;

/// A green phase this close to ending stops vehicles near their stop line
pub const LATE_PHASE_TICKS: u32 = 40;
pub const LATE_PHASE_RADIUS: f32 = 50.0;

/// Distance past the stop line inside which a committed vehicle halts
pub const STOP_ZONE: f32 = 10.0;

/// Distance over which quadratic braking ramps down to zero
pub const BRAKING_DISTANCE_SCALE: f32 = 100.0;

/// Speeds below this count as stalled
pub const STALL_SPEED: f32 = 0.1;

/// Margin around the corridor used by the astride check
pub const CORRIDOR_APPROACH_MARGIN: f32 = 2.0;

/// Two vehicles whose y differs by less than this share a lane
pub const LANE_TOLERANCE: f32 = 5.0;

/// Stop lines sit this far outside the painted crossing
pub const STOP_LINE_DISTANCE_BEFORE_CROSSING: f32 = 15.0;

/// Painted crossing width
pub const ZEBRA_CROSSING_WIDTH: f32 = 40.0;

/// Maximum pedestrians simultaneously in the corridor
pub const CROSSING_CONCURRENCY_CAP: usize = 2;

/// Fraction of the corridor width waiting pedestrians spread across
pub const CROSSING_WAIT_SPREAD: f32 = 0.3;

/// Lateral correction speed of a crosser relative to its walking speed
pub const CROSSING_LATERAL_FACTOR: f32 = 0.2;

/// A crosser this close to its target level has arrived
pub const CROSSING_ARRIVAL_TOLERANCE: f32 = 1.0;

/// Gait rate factor while standing at the kerb
pub const IDLE_GAIT_FACTOR: f32 = 0.1;
