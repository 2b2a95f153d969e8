//! Standalone street simulation module
//!
//! This module contains the core micro-simulation: the day/night clock, the
//! traffic signal, vehicle kinematics and the pedestrian crossing logic. It
//! has no rendering dependencies and can be driven from a console loop.

mod ambient;
mod clock;
mod config;
mod crossing;
mod layout;
mod pedestrian;
mod signal;
mod snapshot;
mod stats;
mod traffic;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use ambient::{CloudPuff, SimBird, SimCloud};
#[allow(unused_imports)]
pub use clock::{darkness_at, daylight_alpha_at, is_night_at, EnvironmentClock};
#[allow(unused_imports)]
pub use config::{
    SimConfig, DEFAULT_HEIGHT, DEFAULT_START_TIME, DEFAULT_TIME_RATE, DEFAULT_WIDTH, NUM_CLOUDS,
    NUM_CROSSING_PEDESTRIANS, NUM_SIDEWALK_PEDESTRIANS, NUM_VEHICLES,
};
#[allow(unused_imports)]
pub use crossing::{
    count_crossers, step_crosser, update_crossing_pedestrians, update_sidewalk_pedestrians,
};
#[allow(unused_imports)]
pub use layout::{CrossingCorridor, SceneLayout};
#[allow(unused_imports)]
pub use pedestrian::{
    CrossingEvent, CrossingGate, PedestrianState, SimPedestrian, SIDEWALK_WRAP_MARGIN,
};
#[allow(unused_imports)]
pub use signal::{PhaseChange, SignalController, SignalPhase, SignalReading};
#[allow(unused_imports)]
pub use snapshot::SceneSnapshot;
#[allow(unused_imports)]
pub use stats::SimulationStats;
#[allow(unused_imports)]
pub use traffic::{corridor_occupied, recycle_vehicle, spawn_vehicles, update_vehicles, LaneIndex};
#[allow(unused_imports)]
pub use types::*;
#[allow(unused_imports)]
pub use vehicle::{Leader, SimVehicle, VehicleUpdateResult, EXIT_MARGIN};
pub use world::SimWorld;
