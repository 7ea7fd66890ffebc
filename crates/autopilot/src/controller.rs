//! # Autopilot Controllers
//!
//! Scripted driving policies that both steer the vehicle and produce the
//! ground-truth steering label for the frame. Positive steering and positive
//! labels both mean a counter-clockwise (leftward) turn, matching
//! [`physics::apply_steer`].
//!
//! -   [`StraightPolicy`] wobbles the vehicle with random nudges and keeps it
//!     on the road with fixed corrections. Its label is a pure proportional
//!     correction on the lateral offset and is independent of the nudges and
//!     corrections actually applied.
//! -   [`PursuitPolicy`] follows an [`ArcRoad`] by aiming at a look-ahead
//!     point on the ideal circle. Its label is exactly the steering it
//!     applies.

use fastrand::Rng;
use physics::{
    normalize_degrees, signed_degrees, ArcRoad, DVec2, RoadGeometry, StraightRoad, VehicleConfig,
    VehicleState, HEADING_UP,
};
use serde::Deserialize;

use crate::random::{chance, random_sign, uniform};

/// Tuning for the straight-road policy. Angles are in degrees.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StraightPolicyConfig {
    /// Per-frame probability of a random nudge
    pub perturb_probability: f64,
    pub perturb_min: f64,
    pub perturb_max: f64,
    /// Turn applied when the vehicle crosses a safe bound
    pub bound_correction: f64,
    /// Allowed drift from straight ahead before the heading is corrected
    pub heading_tolerance: f64,
    pub heading_correction: f64,
    /// Label gain: degrees of correction per pixel of lateral offset
    pub k_offset: f64,
}

impl Default for StraightPolicyConfig {
    fn default() -> Self {
        Self {
            perturb_probability: 0.15,
            perturb_min: 0.2,
            perturb_max: 0.8,
            bound_correction: 8.0,
            heading_tolerance: 5.0,
            heading_correction: 4.0,
            k_offset: 0.1,
        }
    }
}

/// Tuning for the look-ahead arc follower.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PursuitConfig {
    /// Arc length to the aim point, pixels
    pub look_ahead: f64,
    pub kp_angle: f64,
    pub kp_offset: f64,
    /// Per-frame probability of adding label noise
    pub noise_probability: f64,
    /// Noise is uniform in `[-noise_magnitude, noise_magnitude)`
    pub noise_magnitude: f64,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            look_ahead: 100.0,
            kp_angle: 0.5,
            kp_offset: 0.05,
            noise_probability: 0.05,
            noise_magnitude: 0.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutopilotConfig {
    pub straight: StraightPolicyConfig,
    pub pursuit: PursuitConfig,
    /// Per-frame speed is uniform within `nominal * (1 ± speed_variation)`
    pub speed_variation: f64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            straight: StraightPolicyConfig::default(),
            pursuit: PursuitConfig::default(),
            speed_variation: 0.2,
        }
    }
}

/// What the policy decided for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Actuation {
    /// Heading change to apply, degrees
    pub steer: f64,
    /// Ground-truth label recorded with the frame
    pub label: f64,
    pub speed: f64,
}

/// Proportional lane-keeping label for a straight road.
#[must_use]
pub fn straight_label(lateral_offset: f64, k_offset: f64) -> f64 {
    -lateral_offset * k_offset
}

/// Running heading used to evaluate corrections in order within one frame.
struct SteerAccumulator {
    heading: f64,
    total: f64,
}

impl SteerAccumulator {
    fn turn(&mut self, delta: f64) {
        self.heading = normalize_degrees(self.heading + delta);
        self.total += delta;
    }
}

#[derive(Clone, Debug)]
pub struct StraightPolicy {
    road: StraightRoad,
    vehicle: VehicleConfig,
    config: StraightPolicyConfig,
}

impl StraightPolicy {
    #[must_use]
    pub fn new(road: StraightRoad, vehicle: VehicleConfig, config: StraightPolicyConfig) -> Self {
        Self {
            road,
            vehicle,
            config,
        }
    }

    /// Returns `(steer, label)` for the current state.
    pub fn command(&self, state: &VehicleState, rng: &mut Rng) -> (f64, f64) {
        let cfg = &self.config;
        let mut steer = SteerAccumulator {
            heading: state.heading,
            total: 0.0,
        };

        if chance(rng, cfg.perturb_probability) {
            steer.turn(random_sign(rng) * uniform(rng, cfg.perturb_min, cfg.perturb_max));
        }

        let (left, right) = self.road.safe_bounds(&self.vehicle);
        if state.x() < left {
            steer.turn(-cfg.bound_correction);
        } else if state.x() > right {
            steer.turn(cfg.bound_correction);
        }

        if steer.heading > HEADING_UP + cfg.heading_tolerance {
            steer.turn(-cfg.heading_correction);
        } else if steer.heading < HEADING_UP - cfg.heading_tolerance {
            steer.turn(cfg.heading_correction);
        }

        let label = straight_label(self.road.lateral_offset(state), cfg.k_offset);
        (steer.total, label)
    }
}

/// Geometry of one pursuit decision, exposed for inspection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PursuitTrack {
    /// Current polar angle about the arc centre, radians
    pub polar_angle: f64,
    pub target: DVec2,
    /// Heading from the vehicle to the target, degrees in `[0, 360)`
    pub target_heading: f64,
    /// `target_heading - heading`, degrees in `[-180, 180)`
    pub angle_error: f64,
    pub radial_offset: f64,
}

#[derive(Clone, Debug)]
pub struct PursuitPolicy {
    road: ArcRoad,
    config: PursuitConfig,
}

impl PursuitPolicy {
    #[must_use]
    pub fn new(road: ArcRoad, config: PursuitConfig) -> Self {
        Self { road, config }
    }

    /// Angular distance to the aim point, radians.
    #[must_use]
    pub fn angular_step(&self) -> f64 {
        self.config.look_ahead / self.road.radius
    }

    #[must_use]
    pub fn track(&self, state: &VehicleState) -> PursuitTrack {
        let polar_angle = self.road.polar_angle(state.pos);
        let target = self.road.point_at(polar_angle + self.angular_step());

        let dx = target.x - state.x();
        let dy = state.y() - target.y;
        let target_heading = normalize_degrees(dy.atan2(dx).to_degrees());
        let angle_error = signed_degrees(target_heading - state.heading);

        PursuitTrack {
            polar_angle,
            target,
            target_heading,
            angle_error,
            radial_offset: self.road.radial_offset(state.pos),
        }
    }

    /// Noise-free steering for a tracked state.
    #[must_use]
    pub fn ideal_label(&self, track: &PursuitTrack) -> f64 {
        track.angle_error * self.config.kp_angle - track.radial_offset * self.config.kp_offset
    }

    /// Returns `(steer, label)`; the two are equal for this policy.
    pub fn command(&self, state: &VehicleState, rng: &mut Rng) -> (f64, f64) {
        let mut label = self.ideal_label(&self.track(state));
        if chance(rng, self.config.noise_probability) {
            let m = self.config.noise_magnitude;
            label += uniform(rng, -m, m);
        }
        (label, label)
    }
}

/// Road-specific driving policy, chosen once per run.
#[derive(Clone, Debug)]
pub enum Policy {
    Straight(StraightPolicy),
    Pursuit(PursuitPolicy),
}

impl Policy {
    /// Returns `(steer, label)` for the current state.
    pub fn command(&self, state: &VehicleState, rng: &mut Rng) -> (f64, f64) {
        match self {
            Policy::Straight(policy) => policy.command(state, rng),
            Policy::Pursuit(policy) => policy.command(state, rng),
        }
    }
}

/// Policy plus the per-frame speed variation shared by both road types.
#[derive(Clone, Debug)]
pub struct Autopilot {
    policy: Policy,
    nominal_speed: f64,
    speed_variation: f64,
}

impl Autopilot {
    #[must_use]
    pub fn for_road(road: &RoadGeometry, vehicle: &VehicleConfig, config: &AutopilotConfig) -> Self {
        let policy = match road {
            RoadGeometry::Straight(straight) => Policy::Straight(StraightPolicy::new(
                *straight,
                vehicle.clone(),
                config.straight.clone(),
            )),
            RoadGeometry::Arc(arc) => Policy::Pursuit(PursuitPolicy::new(*arc, config.pursuit.clone())),
        };
        Self {
            policy,
            nominal_speed: vehicle.nominal_speed,
            speed_variation: config.speed_variation,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Resamples speed, then asks the policy for steering and label.
    pub fn command(&self, state: &VehicleState, rng: &mut Rng) -> Actuation {
        let v = self.speed_variation;
        let speed = uniform(rng, self.nominal_speed * (1.0 - v), self.nominal_speed * (1.0 + v));
        let (steer, label) = self.policy.command(state, rng);
        Actuation {
            steer,
            label,
            speed,
        }
    }
}
