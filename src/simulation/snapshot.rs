//! Read-only view of a finished tick, handed to whatever draws the scene

use serde::Serialize;

use super::ambient::{SimBird, SimCloud};
use super::layout::CrossingCorridor;
use super::pedestrian::SimPedestrian;
use super::signal::SignalReading;
use super::vehicle::SimVehicle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub tick: u64,
    pub time_of_day: f32,
    pub darkness: f32,
    pub is_night: bool,
    pub signal: SignalReading,
    pub corridor: CrossingCorridor,
    pub vehicles: Vec<SimVehicle>,
    pub sidewalk_pedestrians: Vec<SimPedestrian>,
    pub crossing_pedestrians: Vec<SimPedestrian>,
    pub birds: Vec<SimBird>,
    pub clouds: Vec<SimCloud>,
}

impl SceneSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
