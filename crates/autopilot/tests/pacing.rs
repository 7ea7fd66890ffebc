//! Tests for frame pacing

use std::time::{Duration, Instant};

use autopilot::FramePacer;

#[test]
fn invalid_rates_disable_pacing() {
    assert!(FramePacer::new(0.0).is_none());
    assert!(FramePacer::new(-30.0).is_none());
    assert!(FramePacer::new(f64::NAN).is_none());
    assert!(FramePacer::new(f64::INFINITY).is_none());
}

#[test]
fn frame_duration_is_inverse_rate() {
    let pacer = FramePacer::new(50.0).unwrap();
    assert_eq!(pacer.frame_duration(), Duration::from_millis(20));
}

#[test]
fn wait_holds_the_rate() {
    let mut pacer = FramePacer::new(100.0).unwrap();
    let start = Instant::now();
    for _ in 0..5 {
        pacer.wait();
    }
    assert!(
        start.elapsed() >= Duration::from_millis(40),
        "five paced frames at 100 fps finished in {:?}",
        start.elapsed()
    );
}

#[test]
fn unrepresentable_frame_time_disables_pacing() {
    assert!(FramePacer::new(1e-20).is_none());
    assert!(FramePacer::new(f64::MIN_POSITIVE).is_none());
}
