//! Tests for the arc pure-pursuit policy

use autopilot::{PursuitConfig, PursuitPolicy};
use fastrand::Rng;
use physics::{ArcRoad, DVec2, VehicleState};

const EPS: f64 = 1e-6;

fn arc() -> ArcRoad {
    ArcRoad::new(DVec2::new(400.0, 300.0), 200.0, 90.0, 180.0)
}

fn noiseless() -> PursuitPolicy {
    PursuitPolicy::new(
        arc(),
        PursuitConfig {
            noise_probability: 0.0,
            ..PursuitConfig::default()
        },
    )
}

#[test]
fn angular_step_is_look_ahead_over_radius() {
    let policy = noiseless();
    assert!((policy.angular_step() - 0.5).abs() < EPS);
}

#[test]
fn tangent_heading_errs_by_half_the_step() {
    let policy = noiseless();
    // On the circle at the top, moving along the tangent towards the arc end.
    let car = VehicleState::new(400.0, 100.0, 180.0, 3.0);
    let track = policy.track(&car);

    let half_step = 0.25_f64.to_degrees();
    assert!((track.polar_angle - std::f64::consts::FRAC_PI_2).abs() < EPS);
    assert!(track.radial_offset.abs() < EPS);
    assert!(
        (track.target_heading - (180.0 + half_step)).abs() < EPS,
        "target heading {} should be {}",
        track.target_heading,
        180.0 + half_step
    );
    assert!((track.angle_error - half_step).abs() < EPS);
    assert!((policy.ideal_label(&track) - half_step * 0.5).abs() < EPS);
}

#[test]
fn target_lies_on_the_circle_ahead() {
    let policy = noiseless();
    let car = VehicleState::new(400.0, 100.0, 180.0, 3.0);
    let track = policy.track(&car);
    let angle = std::f64::consts::FRAC_PI_2 + 0.5;
    let expected = DVec2::new(400.0 + 200.0 * angle.cos(), 300.0 - 200.0 * angle.sin());
    assert!((track.target - expected).length() < EPS, "target {:?}", track.target);
    assert!((arc().radial_offset(track.target)).abs() < EPS);
}

#[test]
fn radial_offset_pulls_back_towards_the_circle() {
    let policy = noiseless();
    let outside = VehicleState::new(400.0, 80.0, 180.0, 3.0);
    let track = policy.track(&outside);
    assert!((track.radial_offset - 20.0).abs() < EPS);
    let expected = track.angle_error * 0.5 - 20.0 * 0.05;
    assert!((policy.ideal_label(&track) - expected).abs() < EPS);
}

#[test]
fn angle_error_wraps_through_zero() {
    let policy = noiseless();
    // Target heading is about 194, so the short way round is negative.
    let car = VehicleState::new(400.0, 100.0, 350.0, 3.0);
    let track = policy.track(&car);
    assert!(
        (-180.0..180.0).contains(&track.angle_error),
        "angle error {} not signed",
        track.angle_error
    );
    assert!((track.angle_error - (track.target_heading - 350.0)).abs() < EPS);
}

#[test]
fn steering_equals_label_without_noise() {
    let policy = noiseless();
    let mut rng = Rng::with_seed(3);
    let car = VehicleState::new(380.0, 110.0, 170.0, 3.0);
    let ideal = policy.ideal_label(&policy.track(&car));
    let (steer, label) = policy.command(&car, &mut rng);
    assert!((steer - label).abs() < EPS);
    assert!((label - ideal).abs() < EPS);
}

#[test]
fn noise_is_bounded_and_shared_by_steer_and_label() {
    let policy = PursuitPolicy::new(
        arc(),
        PursuitConfig {
            noise_probability: 1.0,
            ..PursuitConfig::default()
        },
    );
    let mut rng = Rng::with_seed(11);
    let car = VehicleState::new(380.0, 110.0, 170.0, 3.0);
    let ideal = policy.ideal_label(&policy.track(&car));

    let mut perturbed = false;
    for _ in 0..100 {
        let (steer, label) = policy.command(&car, &mut rng);
        assert!((steer - label).abs() < EPS);
        assert!((label - ideal).abs() <= 0.5 + EPS, "noise too large: {}", label - ideal);
        perturbed |= (label - ideal).abs() > EPS;
    }
    assert!(perturbed, "noise never applied");
}

#[test]
fn on_circle_aimed_at_target_needs_no_correction() {
    let policy = noiseless();
    let pos = arc().point_at(120.0_f64.to_radians());
    let aimed = policy.track(&VehicleState::new(pos.x, pos.y, 0.0, 3.0));
    let car = VehicleState::new(pos.x, pos.y, aimed.target_heading, 3.0);

    let track = policy.track(&car);
    assert!(track.angle_error.abs() < EPS, "angle error {}", track.angle_error);
    assert!(track.radial_offset.abs() < EPS, "radial offset {}", track.radial_offset);
    assert!(policy.ideal_label(&track).abs() < EPS);

    let mut rng = Rng::with_seed(4);
    let (steer, label) = policy.command(&car, &mut rng);
    assert!(steer.abs() < EPS && label.abs() < EPS);
}
