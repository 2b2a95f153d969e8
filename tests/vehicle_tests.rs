//! Vehicle kinematics, following and recycling

use rand::rngs::StdRng;
use rand::SeedableRng;
use street_sim::simulation::{
    corridor_occupied, recycle_vehicle, update_vehicles, Color, Direction, LaneIndex, Leader,
    SceneLayout, SignalPhase, SignalReading, SimId, SimVehicle, VehicleId, VehicleKind,
    CAR_ACCELERATION, CAR_DECELERATION, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

fn layout() -> SceneLayout {
    SceneLayout::from_window(DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

fn vehicle(
    id: usize,
    kind: VehicleKind,
    direction: Direction,
    x: f32,
    speed: f32,
    base_speed: f32,
) -> SimVehicle {
    let layout = layout();
    SimVehicle::new(
        VehicleId(SimId(id)),
        kind,
        direction,
        x,
        layout.lane_y(direction),
        speed,
        base_speed,
        Color::new(0.5, 0.5, 0.5),
    )
}

fn red() -> SignalReading {
    SignalReading::new(SignalPhase::Red, 0)
}

fn green_with(remaining: u32) -> SignalReading {
    SignalReading::new(SignalPhase::Green, SignalPhase::Green.duration() - remaining)
}

#[test]
fn test_vehicle_stops_before_stop_line_on_red() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;

    for kind in VehicleKind::ALL {
        let (width, _) = kind.dimensions();
        let mut v = vehicle(0, kind, Direction::Forward, stop_line - 400.0 - width, 0.9, 0.9);

        for _ in 0..2000 {
            v.update(&red(), &layout, None);
            assert!(
                v.front_edge() <= stop_line,
                "{:?} front {} passed stop line {}",
                kind,
                v.front_edge(),
                stop_line
            );
        }
        assert_eq!(v.speed, 0.0, "{:?} did not come to rest", kind);
    }
}

#[test]
fn test_backward_vehicle_stops_before_its_stop_line_on_red() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_backward;
    let mut v = vehicle(0, VehicleKind::Car, Direction::Backward, stop_line + 400.0, 1.4, 1.4);

    for _ in 0..2000 {
        v.update(&red(), &layout, None);
        assert!(v.front_edge() >= stop_line);
        assert!(!layout.corridor.overlaps(v.x, v.width));
    }
    assert!(v.speed < 0.01, "speed {}", v.speed);
}

#[test]
fn test_backward_traffic_brakes_down_to_its_stop_line() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_backward;

    for kind in VehicleKind::ALL {
        let mut v = vehicle(0, kind, Direction::Backward, stop_line + 500.0, 1.0, 1.0);
        for _ in 0..3000 {
            v.update(&red(), &layout, None);
            assert!(v.front_edge() >= stop_line);
        }
        let short_by = v.front_edge() - stop_line;
        assert!(
            short_by < 15.0,
            "{:?} rested {:.1} units short of its stop line",
            kind,
            short_by
        );
        assert!(v.speed < 0.01);
    }
}

#[test]
fn test_far_vehicle_ignores_long_green() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, stop_line - 360.0, 1.0, 1.0);

    assert!(!v.should_stop_for_signal(&green_with(400), &layout.corridor));
    assert_eq!(v.signal_speed_limit(&green_with(400), &layout.corridor), 1.0);
}

#[test]
fn test_green_about_to_end_stops_nearby_vehicle() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, stop_line - 30.0 - 60.0, 1.0, 1.0);

    assert!(v.should_stop_for_signal(&green_with(30), &layout.corridor));
}

#[test]
fn test_vehicle_past_decision_point_that_cannot_clear_brakes() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    // Front 30 units short of the line, past the 60-unit decision point
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, stop_line - 30.0 - 60.0, 1.0, 1.0);

    assert!(v.should_stop_for_signal(&green_with(100), &layout.corridor));
    assert!(!v.should_stop_for_signal(&green_with(400), &layout.corridor));
}

#[test]
fn test_vehicle_inside_stop_zone_halts() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, stop_line + 5.0 - 60.0, 0.5, 1.0);

    assert_eq!(v.signal_speed_limit(&red(), &layout.corridor), 0.0);
}

#[test]
fn test_vehicle_already_through_keeps_going() {
    let layout = layout();
    let corridor = layout.corridor;
    // Rear already past the strip
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, corridor.back_edge + 20.0, 1.0, 1.0);

    assert_eq!(v.signal_speed_limit(&red(), &corridor), 1.0);
}

#[test]
fn test_quadratic_braking_on_approach() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, stop_line - 80.0 - 60.0, 1.0, 1.0);

    let limit = v.signal_speed_limit(&red(), &layout.corridor);
    assert!((limit - 0.64).abs() < 1e-4, "limit {}", limit);
}

#[test]
fn test_following_rules() {
    let v = vehicle(0, VehicleKind::Car, Direction::Forward, 0.0, 1.0, 1.2);

    assert_eq!(v.following_speed_limit(None), 1.2 * 1.5);

    let comfortable = Leader { gap: 100.0, speed: 0.2 };
    assert_eq!(v.following_speed_limit(Some(comfortable)), 1.2 * 1.5);

    let close = Leader { gap: 27.0, speed: 0.7 };
    assert_eq!(v.following_speed_limit(Some(close)), 0.7);

    let too_close = Leader { gap: 10.0, speed: 0.9 };
    let limit = v.following_speed_limit(Some(too_close));
    assert!((limit - 0.5).abs() < 1e-6, "limit {}", limit);

    let stopped = Leader { gap: 5.0, speed: 0.0 };
    assert_eq!(v.following_speed_limit(Some(stopped)), 0.0);
}

#[test]
fn test_speed_steps_are_asymmetric() {
    let mut v = vehicle(0, VehicleKind::Car, Direction::Forward, 0.0, 0.5, 1.0);
    v.approach_speed(1.0);
    assert!((v.speed - (0.5 + CAR_ACCELERATION)).abs() < 1e-6);

    let mut v = vehicle(0, VehicleKind::Car, Direction::Forward, 0.0, 1.0, 1.0);
    v.approach_speed(0.0);
    assert!((v.speed - (1.0 - CAR_DECELERATION)).abs() < 1e-6);

    let mut v = vehicle(0, VehicleKind::Car, Direction::Forward, 0.0, 0.03, 1.0);
    v.approach_speed(0.0);
    assert_eq!(v.speed, 0.0);
}

#[test]
fn test_lane_index_finds_nearest_leader_in_same_lane() {
    let vehicles = vec![
        vehicle(0, VehicleKind::Car, Direction::Forward, 100.0, 1.0, 1.0),
        vehicle(1, VehicleKind::Bus, Direction::Forward, 300.0, 0.4, 1.0),
        vehicle(2, VehicleKind::Truck, Direction::Forward, 200.0, 0.6, 1.0),
        vehicle(3, VehicleKind::Car, Direction::Backward, 150.0, 1.0, 1.0),
        vehicle(4, VehicleKind::Car, Direction::Backward, 400.0, 1.0, 1.0),
    ];
    let index = LaneIndex::build(&vehicles);

    assert_eq!(index.find_vehicle_ahead(&vehicles, 0), Some(2));
    assert_eq!(index.find_vehicle_ahead(&vehicles, 2), Some(1));
    assert_eq!(index.find_vehicle_ahead(&vehicles, 1), None);

    // Backward traffic: ahead means smaller x
    assert_eq!(index.find_vehicle_ahead(&vehicles, 4), Some(3));
    assert_eq!(index.find_vehicle_ahead(&vehicles, 3), None);

    let leader = index.leader(&vehicles, 0).expect("vehicle 0 has a leader");
    assert!((leader.gap - (200.0 - 160.0)).abs() < 1e-4);
    assert_eq!(leader.speed, 0.6);

    let leader = index.leader(&vehicles, 4).expect("vehicle 4 has a leader");
    assert!((leader.gap - (400.0 - 210.0)).abs() < 1e-4);
}

#[test]
fn test_follower_never_rear_ends_stopped_leader() {
    let layout = layout();
    let stop_line = layout.corridor.stop_line_forward;
    let mut vehicles = vec![
        vehicle(0, VehicleKind::Truck, Direction::Forward, stop_line - 200.0, 0.8, 0.8),
        vehicle(1, VehicleKind::Car, Direction::Forward, stop_line - 450.0, 1.5, 1.5),
    ];
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..2000 {
        update_vehicles(&mut vehicles, &red(), &layout, &mut rng);
        let gap = vehicles[0].x - (vehicles[1].x + vehicles[1].width);
        assert!(gap > 0.0, "follower overlapped leader (gap {})", gap);
    }
    assert_eq!(vehicles[0].speed, 0.0);
    assert_eq!(vehicles[1].speed, 0.0);
}

#[test]
fn test_departing_vehicle_is_recycled_in_place() {
    let layout = layout();
    let mut vehicles = vec![vehicle(
        0,
        VehicleKind::Car,
        Direction::Forward,
        layout.width + 49.5,
        1.0,
        1.0,
    )];
    let mut rng = StdRng::seed_from_u64(11);

    let recycled = update_vehicles(&mut vehicles, &green_with(400), &layout, &mut rng);
    assert_eq!(recycled, vec![VehicleId(SimId(0))]);
    assert_eq!(vehicles.len(), 1);

    let v = &vehicles[0];
    assert!(v.x + v.width <= -150.0);
    assert_eq!(v.direction, Direction::Forward);
    assert_eq!(v.y, layout.lane_forward_y);
    assert!(v.kind.cruise_speed_range().contains(&v.base_speed));
    assert!(v.speed <= v.base_speed * 0.8 + 1e-6);
    assert!(v.speed >= v.base_speed * 0.5 - 1e-6);
}

#[test]
fn test_stalled_vehicle_recycles_from_rest() {
    let layout = layout();
    let mut vehicles = vec![vehicle(
        0,
        VehicleKind::Bus,
        Direction::Backward,
        -200.0,
        0.05,
        1.0,
    )];
    let mut rng = StdRng::seed_from_u64(5);

    recycle_vehicle(&mut vehicles, 0, &layout, &mut rng);
    assert_eq!(vehicles[0].speed, 0.0);
    assert!(vehicles[0].x >= layout.width + 50.0 + 150.0);
    assert_eq!(vehicles[0].y, layout.lane_backward_y);
}

#[test]
fn test_recycled_vehicle_never_overlaps_lane_mates() {
    let layout = layout();

    for seed in 0..50 {
        let mut vehicles = vec![vehicle(0, VehicleKind::Car, Direction::Forward, 2000.0, 1.0, 1.0)];
        // Pack the entry zone with queued traffic
        for (i, x) in [-250.0, -380.0, -510.0, -640.0].iter().enumerate() {
            vehicles.push(vehicle(i + 1, VehicleKind::Bus, Direction::Forward, *x, 1.0, 1.0));
        }
        vehicles.push(vehicle(9, VehicleKind::Truck, Direction::Backward, -300.0, 1.0, 1.0));

        let mut rng = StdRng::seed_from_u64(seed);
        recycle_vehicle(&mut vehicles, 0, &layout, &mut rng);

        let recycled = &vehicles[0];
        for other in vehicles[1..].iter().filter(|o| o.direction == recycled.direction) {
            assert!(
                !other.overlaps_span(recycled.x, recycled.width),
                "seed {}: recycled at {} overlaps vehicle at {}",
                seed,
                recycled.x,
                other.x
            );
        }
    }
}

#[test]
fn test_corridor_occupancy() {
    let layout = layout();
    let corridor = layout.corridor;

    let clear = vec![
        vehicle(0, VehicleKind::Car, Direction::Forward, corridor.front_edge - 60.0, 1.0, 1.0),
        vehicle(1, VehicleKind::Car, Direction::Backward, corridor.back_edge, 1.0, 1.0),
    ];
    assert!(!corridor_occupied(&clear, &corridor));

    let blocked = vec![vehicle(
        0,
        VehicleKind::Car,
        Direction::Forward,
        corridor.front_edge - 30.0,
        1.0,
        1.0,
    )];
    assert!(corridor_occupied(&blocked, &corridor));
}
