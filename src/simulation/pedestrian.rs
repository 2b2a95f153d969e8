//! Pedestrians and the crossing state machine

use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;

use super::layout::SceneLayout;
use super::signal::SignalPhase;
use super::types::{
    advance_phase, Color, PathSide, PedestrianId, CROSSING_CONCURRENCY_CAP, IDLE_GAIT_FACTOR,
};

/// How far past the scene edge a sidewalk walker goes before wrapping
pub const SIDEWALK_WRAP_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PedestrianState {
    /// Strolling along a footpath; never crosses
    WalkingSidewalk,
    WaitingToCross,
    Crossing,
    FinishedCrossing,
}

/// Side effects of a crossing transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingEvent {
    /// Entered the corridor; the crosser count went up by one
    Released,
    /// Reached the far sidewalk
    Arrived,
    /// Turned around to wait for the next red on the new side
    Rearmed,
}

/// Everything a waiting pedestrian must know before stepping off the kerb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingGate {
    pub is_night: bool,
    pub phase: SignalPhase,
    /// Pedestrians currently in the corridor
    pub crossers: usize,
    pub cap: usize,
    pub corridor_occupied: bool,
}

impl CrossingGate {
    pub fn new(is_night: bool, phase: SignalPhase, crossers: usize, corridor_occupied: bool) -> Self {
        Self {
            is_night,
            phase,
            crossers,
            cap: CROSSING_CONCURRENCY_CAP,
            corridor_occupied,
        }
    }

    pub fn allows_release(&self) -> bool {
        !self.is_night
            && self.phase == SignalPhase::Red
            && self.crossers < self.cap
            && !self.corridor_occupied
    }
}

impl PedestrianState {
    /// Next state for a crossing pedestrian
    ///
    /// `arrived` reports whether a crosser is within tolerance of its target
    /// level after this tick's movement.
    pub fn transition(self, gate: &CrossingGate, arrived: bool) -> (Self, Option<CrossingEvent>) {
        match self {
            PedestrianState::WaitingToCross if gate.allows_release() => {
                (PedestrianState::Crossing, Some(CrossingEvent::Released))
            }
            PedestrianState::Crossing if arrived => {
                (PedestrianState::FinishedCrossing, Some(CrossingEvent::Arrived))
            }
            PedestrianState::FinishedCrossing if gate.phase != SignalPhase::Red => {
                (PedestrianState::WaitingToCross, Some(CrossingEvent::Rearmed))
            }
            state => (state, None),
        }
    }

    /// Gait rate multiplier while in this state
    pub fn gait_factor(self) -> f32 {
        match self {
            PedestrianState::Crossing => 1.0,
            _ => IDLE_GAIT_FACTOR,
        }
    }
}

/// A pedestrian in the street simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimPedestrian {
    pub id: PedestrianId,
    pub x: f32,
    pub y: f32,
    /// Signed for sidewalk walkers, magnitude only for crossers
    pub speed: f32,
    pub state: PedestrianState,
    pub path_side: PathSide,
    /// Level of the opposite sidewalk (crossers only)
    pub target_y: f32,
    pub gait_phase: f32,
    pub gait_speed: f32,
    pub clothing: Color,
}

impl SimPedestrian {
    /// A walker on a random footpath heading either way
    pub fn sidewalk<R: Rng>(id: PedestrianId, layout: &SceneLayout, rng: &mut R) -> Self {
        let path_side = PathSide::random(rng);
        let heading = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let y = layout.sidewalk_y(path_side);
        Self {
            id,
            x: rng.random_range(0.0..=layout.width),
            y,
            speed: rng.random_range(0.3..=0.7) * heading,
            state: PedestrianState::WalkingSidewalk,
            path_side,
            target_y: y,
            gait_phase: rng.random_range(0.0..TAU),
            gait_speed: rng.random_range(0.08..=0.15),
            clothing: Color::random(rng),
        }
    }

    /// A pedestrian waiting at the kerb on `path_side`
    pub fn crosser<R: Rng>(
        id: PedestrianId,
        path_side: PathSide,
        layout: &SceneLayout,
        rng: &mut R,
    ) -> Self {
        let corridor = &layout.corridor;
        let spread = corridor.wait_spread();
        Self {
            id,
            x: corridor.center_x + rng.random_range(-spread..=spread),
            y: layout.sidewalk_y(path_side),
            speed: rng.random_range(0.5..=0.8),
            state: PedestrianState::WaitingToCross,
            path_side,
            target_y: layout.sidewalk_y(path_side.opposite()),
            gait_phase: rng.random_range(0.0..TAU),
            gait_speed: rng.random_range(0.1..=0.18),
            clothing: Color::random(rng),
        }
    }

    pub fn is_crossing(&self) -> bool {
        self.state == PedestrianState::Crossing
    }

    /// Advance the gait by `factor` of the personal rate
    pub fn step_gait(&mut self, factor: f32) {
        self.gait_phase = advance_phase(self.gait_phase, self.gait_speed * factor);
    }

    /// Put the pedestrian back on the geometry of `layout`
    ///
    /// `corridor_shift` is how far the corridor centre moved; crossers move
    /// with it so they stay on the strip.
    pub fn reseat(&mut self, layout: &SceneLayout, corridor_shift: f32) {
        let corridor = &layout.corridor;
        match self.state {
            PedestrianState::WalkingSidewalk => {
                self.y = layout.sidewalk_y(self.path_side);
                self.target_y = self.y;
            }
            PedestrianState::WaitingToCross | PedestrianState::FinishedCrossing => {
                let side = if self.state == PedestrianState::FinishedCrossing {
                    self.path_side.opposite()
                } else {
                    self.path_side
                };
                let spread = corridor.wait_spread();
                self.x = (self.x + corridor_shift)
                    .clamp(corridor.center_x - spread, corridor.center_x + spread);
                self.y = layout.sidewalk_y(side);
                self.target_y = layout.sidewalk_y(self.path_side.opposite());
            }
            PedestrianState::Crossing => {
                self.x += corridor_shift;
                self.target_y = layout.sidewalk_y(self.path_side.opposite());
            }
        }
    }
}
