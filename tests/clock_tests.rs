//! Day/night clock behaviour

use street_sim::simulation::{
    darkness_at, daylight_alpha_at, is_night_at, EnvironmentClock, NIGHT_END_TIME,
    NIGHT_START_TIME,
};

#[test]
fn test_darkness_zero_at_noon() {
    assert!(darkness_at(0.5).abs() < 1e-6);
}

#[test]
fn test_darkness_bounded_and_continuous() {
    let steps = 10_000;
    let mut previous = darkness_at(0.0);
    for i in 0..steps {
        let time = i as f32 / steps as f32;
        let darkness = darkness_at(time);
        assert!((0.0..=1.0).contains(&darkness), "darkness {} at {}", darkness, time);
        assert!(
            (darkness - previous).abs() < 0.01,
            "darkness jumped from {} to {} at {}",
            previous,
            darkness,
            time
        );
        previous = darkness;
    }
}

#[test]
fn test_darkness_saturates_near_midnight() {
    assert_eq!(darkness_at(0.0), 1.0);
    assert_eq!(darkness_at(0.99), 1.0);
    assert!(darkness_at(0.3) < darkness_at(0.2));
    assert!(darkness_at(0.7) > darkness_at(0.6));
}

#[test]
fn test_night_window_wraps_through_midnight() {
    assert!(is_night_at(0.0));
    assert!(is_night_at(NIGHT_END_TIME));
    assert!(!is_night_at(NIGHT_END_TIME + 0.001));
    assert!(!is_night_at(0.5));
    assert!(!is_night_at(NIGHT_START_TIME - 0.001));
    assert!(is_night_at(NIGHT_START_TIME));
    assert!(is_night_at(0.999));
}

#[test]
fn test_night_has_exactly_two_boundaries() {
    let steps = 10_000;
    let mut changes = 0;
    let mut previous = is_night_at(0.0);
    for i in 1..steps {
        let night = is_night_at(i as f32 / steps as f32);
        if night != previous {
            changes += 1;
        }
        previous = night;
    }
    assert_eq!(changes, 2);
}

#[test]
fn test_advance_wraps_past_midnight() {
    let mut clock = EnvironmentClock::new(0.9999, 0.0001, true);
    clock.advance(0.0003);
    assert!(clock.time() < 1.0);
    assert!((clock.time() - 0.0002).abs() < 1e-4);
}

#[test]
fn test_tick_advances_by_rate() {
    let mut clock = EnvironmentClock::new(0.15, 0.001, true);
    for _ in 0..100 {
        clock.tick();
    }
    assert!((clock.time() - 0.25).abs() < 1e-4);
    assert!(!clock.is_night());
}

#[test]
fn test_queries_are_idempotent() {
    let clock = EnvironmentClock::new(0.7, 0.0001, true);
    let first = (clock.darkness(), clock.is_night());
    let second = (clock.darkness(), clock.is_night());
    assert_eq!(first, second);
    assert_eq!(clock.time(), 0.7);
}

#[test]
fn test_disabled_cycle_freezes_time_and_light() {
    let mut clock = EnvironmentClock::new(0.9, 0.0001, false);
    for _ in 0..1000 {
        clock.tick();
    }
    assert_eq!(clock.time(), 0.9);
    assert_eq!(clock.darkness(), 0.0);
    assert!(!clock.is_night());
    assert_eq!(clock.daylight_alpha(), 1.0);
}

#[test]
fn test_daylight_alpha_fades_at_dawn_and_dusk() {
    assert_eq!(daylight_alpha_at(0.1), 0.0);
    assert_eq!(daylight_alpha_at(0.4), 1.0);
    assert_eq!(daylight_alpha_at(0.8), 0.0);

    let dawn = daylight_alpha_at(NIGHT_END_TIME + 0.05);
    assert!((dawn - 0.5).abs() < 1e-3, "dawn alpha {}", dawn);

    let dusk = daylight_alpha_at(NIGHT_START_TIME - 0.05);
    assert!((dusk - 0.5).abs() < 1e-3, "dusk alpha {}", dusk);
}
