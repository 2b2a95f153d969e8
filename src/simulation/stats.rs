//! Running counters for a simulation run

use serde::Serialize;

use super::pedestrian::CrossingEvent;
use super::signal::PhaseChange;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub phase_changes: u64,
    /// Completed Green -> Yellow -> Red -> Green cycles
    pub signal_cycles: u64,
    pub vehicles_recycled: u64,
    pub crossings_started: u64,
    pub crossings_completed: u64,
    /// Most pedestrians seen in the corridor at once
    pub peak_crossers: usize,
}

impl SimulationStats {
    pub fn record_phase_change(&mut self, change: &PhaseChange) {
        self.phase_changes += 1;
        if change.completes_cycle() {
            self.signal_cycles += 1;
        }
    }

    pub fn record_crossing_event(&mut self, event: CrossingEvent) {
        match event {
            CrossingEvent::Released => self.crossings_started += 1,
            CrossingEvent::Arrived => self.crossings_completed += 1,
            CrossingEvent::Rearmed => {}
        }
    }

    pub fn record_crossers(&mut self, crossers: usize) {
        self.peak_crossers = self.peak_crossers.max(crossers);
    }
}
