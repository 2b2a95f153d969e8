//! Crossing coordination and sidewalk strolling
//!
//! Crossers are scanned in pool order every tick, so when several are
//! eligible in the same tick the earlier slots step off first.

use log::debug;
use rand::Rng;

use super::layout::SceneLayout;
use super::pedestrian::{
    CrossingEvent, CrossingGate, PedestrianState, SimPedestrian, SIDEWALK_WRAP_MARGIN,
};
use super::types::{
    move_towards, PedestrianId, CROSSING_ARRIVAL_TOLERANCE, CROSSING_LATERAL_FACTOR,
};

/// Number of pedestrians currently in the corridor
pub fn count_crossers(pedestrians: &[SimPedestrian]) -> usize {
    pedestrians.iter().filter(|p| p.is_crossing()).count()
}

/// Update every crossing pedestrian for one tick
///
/// `gate.crossers` should hold the count at the start of the tick; it is
/// raised as pedestrians are released so the cap holds within the tick.
pub fn update_crossing_pedestrians<R: Rng>(
    pedestrians: &mut [SimPedestrian],
    mut gate: CrossingGate,
    layout: &SceneLayout,
    rng: &mut R,
) -> Vec<(PedestrianId, CrossingEvent)> {
    let mut events = Vec::new();

    for pedestrian in pedestrians.iter_mut() {
        if let Some(event) = step_crosser(pedestrian, &gate, layout, rng) {
            if event == CrossingEvent::Released {
                gate.crossers += 1;
            }
            events.push((pedestrian.id, event));
        }
        pedestrian.step_gait(pedestrian.state.gait_factor());
    }

    events
}

/// Move one crosser and apply its state transition
pub fn step_crosser<R: Rng>(
    pedestrian: &mut SimPedestrian,
    gate: &CrossingGate,
    layout: &SceneLayout,
    rng: &mut R,
) -> Option<CrossingEvent> {
    let corridor = &layout.corridor;

    let arrived = if pedestrian.state == PedestrianState::Crossing {
        pedestrian.x = move_towards(
            pedestrian.x,
            corridor.center_x,
            pedestrian.speed * CROSSING_LATERAL_FACTOR,
        );
        pedestrian.y = move_towards(pedestrian.y, pedestrian.target_y, pedestrian.speed);
        (pedestrian.y - pedestrian.target_y).abs() < CROSSING_ARRIVAL_TOLERANCE
    } else {
        false
    };

    let (next, event) = pedestrian.state.transition(gate, arrived);
    pedestrian.state = next;

    let spread = corridor.wait_spread();
    match event {
        Some(CrossingEvent::Released) => {
            debug!(
                "Pedestrian {:?} stepped off the {:?} kerb ({} already crossing)",
                pedestrian.id.0, pedestrian.path_side, gate.crossers
            );
        }
        Some(CrossingEvent::Arrived) => {
            pedestrian.y = pedestrian.target_y;
            pedestrian.x = corridor.center_x + rng.random_range(-spread..=spread);
            debug!("Pedestrian {:?} reached the far side", pedestrian.id.0);
        }
        Some(CrossingEvent::Rearmed) => {
            pedestrian.path_side = pedestrian.path_side.opposite();
            pedestrian.target_y = layout.sidewalk_y(pedestrian.path_side.opposite());
            pedestrian.x = corridor.center_x + rng.random_range(-spread..=spread);
        }
        None => {}
    }

    event
}

/// Stroll sidewalk pedestrians along their footpath; at night they stand still
pub fn update_sidewalk_pedestrians(
    pedestrians: &mut [SimPedestrian],
    is_night: bool,
    layout: &SceneLayout,
) {
    for pedestrian in pedestrians.iter_mut() {
        // At night the gait phase is held where it stopped, not reset
        if !is_night {
            pedestrian.x += pedestrian.speed;
            pedestrian.step_gait(pedestrian.speed.abs());

            if pedestrian.speed > 0.0 && pedestrian.x > layout.width + SIDEWALK_WRAP_MARGIN {
                pedestrian.x = -SIDEWALK_WRAP_MARGIN;
            } else if pedestrian.speed < 0.0 && pedestrian.x < -SIDEWALK_WRAP_MARGIN {
                pedestrian.x = layout.width + SIDEWALK_WRAP_MARGIN;
            }
        }
        pedestrian.y = layout.sidewalk_y(pedestrian.path_side);
    }
}
