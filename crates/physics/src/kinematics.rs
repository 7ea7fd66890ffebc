//! # Vehicle Kinematics
//!
//! Point-mass kinematic model for the vehicle. There is no inertia and no
//! slip: steering rotates the heading directly and `advance` moves the
//! vehicle along it. Both functions mutate the state in place.

use crate::angle::normalize_degrees;
use crate::types::VehicleState;

/// Moves the vehicle `speed * dt` pixels along its heading.
///
/// Screen y grows downward, so an upward heading decreases `y`.
pub fn advance(state: &mut VehicleState, dt: f64) {
    let rad = state.heading.to_radians();
    let distance = state.speed * dt;
    state.pos.x += distance * rad.cos();
    state.pos.y -= distance * rad.sin();
}

/// Rotates the heading by `delta_degrees`; positive turns counter-clockwise.
pub fn apply_steer(state: &mut VehicleState, delta_degrees: f64) {
    state.heading = normalize_degrees(state.heading + delta_degrees);
}
