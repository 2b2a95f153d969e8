//! Vehicle spawning, lane lookups and per-tick updates
//!
//! Vehicles live in a fixed pool. A vehicle leaving the scene is recycled in
//! place rather than removed, so the pool never changes size.

use log::debug;
use ordered_float::OrderedFloat;
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::Bound;

use super::layout::{CrossingCorridor, SceneLayout};
use super::signal::SignalReading;
use super::types::{Direction, SimId, VehicleId, CAR_MIN_SAFE_DISTANCE, LANE_TOLERANCE};
use super::vehicle::{Leader, SimVehicle, VehicleUpdateResult};

/// Gap between queued vehicles at start-up, before jitter
const INITIAL_SPACING: f32 = 150.0;

/// Distance off-screen the first vehicle of each lane starts at
const INITIAL_OFFSET: f32 = 200.0;

/// Build the initial pool, alternating lanes and queueing vehicles off-screen
pub fn spawn_vehicles<R: Rng>(
    count: usize,
    first_id: usize,
    layout: &SceneLayout,
    rng: &mut R,
) -> Vec<SimVehicle> {
    // Distance beyond the entry edge of the next free slot, per lane
    let mut queue_offsets = [INITIAL_OFFSET; 2];

    (0..count)
        .map(|i| {
            let direction = if i % 2 == 0 {
                Direction::Forward
            } else {
                Direction::Backward
            };
            let id = VehicleId(SimId(first_id + i));
            let mut vehicle = SimVehicle::random(id, direction, layout, rng);

            let offset = queue_offsets[i % 2];
            vehicle.x = match direction {
                Direction::Forward => -offset,
                Direction::Backward => layout.width + offset,
            };
            queue_offsets[i % 2] =
                offset + vehicle.width + INITIAL_SPACING + rng.random_range(0.0..=50.0);
            vehicle
        })
        .collect()
}

fn same_lane(a: &SimVehicle, b: &SimVehicle) -> bool {
    a.direction == b.direction && (a.y - b.y).abs() < LANE_TOLERANCE
}

/// Vehicles ordered along their direction of travel, keyed by rear edge
///
/// Keys grow in the direction of travel, so the vehicle ahead of another is
/// the next entry with a strictly greater key.
pub struct LaneIndex {
    forward: BTreeMap<(OrderedFloat<f32>, usize), usize>,
    backward: BTreeMap<(OrderedFloat<f32>, usize), usize>,
}

impl LaneIndex {
    pub fn build(vehicles: &[SimVehicle]) -> Self {
        let mut index = Self {
            forward: BTreeMap::new(),
            backward: BTreeMap::new(),
        };
        for (i, vehicle) in vehicles.iter().enumerate() {
            let key = (Self::travel_key(vehicle), i);
            match vehicle.direction {
                Direction::Forward => index.forward.insert(key, i),
                Direction::Backward => index.backward.insert(key, i),
            };
        }
        index
    }

    fn travel_key(vehicle: &SimVehicle) -> OrderedFloat<f32> {
        OrderedFloat(vehicle.rear_edge() * vehicle.direction.sign())
    }

    /// Index of the nearest vehicle ahead of `vehicles[i]` in its lane
    pub fn find_vehicle_ahead(&self, vehicles: &[SimVehicle], i: usize) -> Option<usize> {
        let vehicle = &vehicles[i];
        let lane = match vehicle.direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        let lower = (Self::travel_key(vehicle), usize::MAX);

        lane.range((Bound::Excluded(lower), Bound::Unbounded))
            .map(|(_, &j)| j)
            .find(|&j| j != i && same_lane(vehicle, &vehicles[j]))
    }

    /// Gap and speed of the vehicle ahead of `vehicles[i]`
    pub fn leader(&self, vehicles: &[SimVehicle], i: usize) -> Option<Leader> {
        self.find_vehicle_ahead(vehicles, i).map(|j| {
            let vehicle = &vehicles[i];
            let ahead = &vehicles[j];
            Leader {
                gap: (ahead.rear_edge() - vehicle.front_edge()) * vehicle.direction.sign(),
                speed: ahead.speed,
            }
        })
    }
}

/// Update every vehicle against the state at the start of the tick
///
/// Returns the ids of vehicles that left the scene and were recycled.
pub fn update_vehicles<R: Rng>(
    vehicles: &mut [SimVehicle],
    signal: &SignalReading,
    layout: &SceneLayout,
    rng: &mut R,
) -> Vec<VehicleId> {
    let index = LaneIndex::build(vehicles);
    let leaders: Vec<Option<Leader>> = (0..vehicles.len())
        .map(|i| index.leader(vehicles, i))
        .collect();

    let mut departed = Vec::new();
    for (i, vehicle) in vehicles.iter_mut().enumerate() {
        if vehicle.update(signal, layout, leaders[i]) == VehicleUpdateResult::LeftScene {
            departed.push(i);
        }
    }

    departed
        .into_iter()
        .map(|i| recycle_vehicle(vehicles, i, layout, rng))
        .collect()
}

/// Recycle `vehicles[i]` and make sure it does not land on a lane-mate
pub fn recycle_vehicle<R: Rng>(
    vehicles: &mut [SimVehicle],
    i: usize,
    layout: &SceneLayout,
    rng: &mut R,
) -> VehicleId {
    vehicles[i].recycle(layout, rng);
    clear_spawn_slot(vehicles, i);

    let vehicle = &vehicles[i];
    debug!(
        "Recycled vehicle {:?} as {:?} at x={:.1} (speed {:.2})",
        vehicle.id.0, vehicle.kind, vehicle.x, vehicle.speed
    );
    vehicle.id
}

/// Push `vehicles[i]` further off-screen until it keeps a safe gap to every
/// vehicle in its lane
fn clear_spawn_slot(vehicles: &mut [SimVehicle], i: usize) {
    // Each push moves strictly further back, so one pass per vehicle suffices
    for _ in 0..vehicles.len() {
        let vehicle = &vehicles[i];
        let padded_left = vehicle.x - CAR_MIN_SAFE_DISTANCE;
        let padded_width = vehicle.width + 2.0 * CAR_MIN_SAFE_DISTANCE;

        let blocker = vehicles
            .iter()
            .enumerate()
            .find(|(j, other)| {
                *j != i && same_lane(vehicle, other) && other.overlaps_span(padded_left, padded_width)
            })
            .map(|(_, other)| (other.x, other.width));

        let Some((blocker_x, blocker_width)) = blocker else {
            return;
        };

        let vehicle = &mut vehicles[i];
        vehicle.x = match vehicle.direction {
            Direction::Forward => {
                vehicle.x.min(blocker_x - vehicle.width - CAR_MIN_SAFE_DISTANCE)
            }
            Direction::Backward => vehicle.x.max(blocker_x + blocker_width + CAR_MIN_SAFE_DISTANCE),
        };
    }
}

/// Whether any vehicle body overlaps the crossing strip
pub fn corridor_occupied(vehicles: &[SimVehicle], corridor: &CrossingCorridor) -> bool {
    vehicles
        .iter()
        .any(|vehicle| corridor.overlaps(vehicle.x, vehicle.width))
}
