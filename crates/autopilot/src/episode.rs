//! # Episode Reset Manager
//!
//! Watches the vehicle after every kinematic step and puts it back on the
//! road when an episode ends. Resets are applied in the same frame they are
//! detected, so the camera never sees an off-track vehicle.
//!
//! Straight roads end an episode in two ways:
//!
//! -   **Wrap:** the vehicle left through the top edge. It reappears below the
//!     bottom edge near the centre line, keeping its heading, which makes the
//!     corridor effectively endless.
//! -   **Restart:** the vehicle left through the bottom or off the side of
//!     the road. It goes back to the canonical start pose.
//!
//! Arc roads restart at the arc's start point once the vehicle passes the end
//! angle, drifts too far from the ideal radius, or crosses the fallback
//! bounds around the arc. The conditions are checked as a disjunction.

use fastrand::Rng;
use physics::{ArcRoad, RoadGeometry, SceneSize, StraightRoad, VehicleConfig, VehicleState, HEADING_UP};
use serde::Deserialize;

use crate::random::uniform;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResetConfig {
    /// Half-range of the uniform x jitter applied on straight wraps and restarts
    pub lateral_jitter: f64,
    /// Gap between the vehicle's rear and the bottom edge at a straight restart
    pub start_margin: f64,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            lateral_jitter: 20.0,
            start_margin: 50.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResetKind {
    /// Moved from above the top edge to below the bottom edge
    Wrapped,
    /// Returned to the canonical start pose
    Restarted,
}

/// Episode state for one frame. `Resetting` never outlives the frame that
/// produced it: the vehicle has already been moved when it is reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpisodePhase {
    Driving,
    Resetting(ResetKind),
}

/// Frame and episode numbering for a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeCounters {
    /// Frames simulated since the run started
    pub frame: u64,
    /// Completed episodes
    pub episode: u64,
    /// Frames since the current episode began
    pub episode_frame: u64,
}

impl EpisodeCounters {
    pub fn advance(&mut self, phase: EpisodePhase) {
        self.frame += 1;
        match phase {
            EpisodePhase::Driving => self.episode_frame += 1,
            EpisodePhase::Resetting(_) => {
                self.episode += 1;
                self.episode_frame = 0;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResetManager {
    road: RoadGeometry,
    vehicle: VehicleConfig,
    scene: SceneSize,
    config: ResetConfig,
}

impl ResetManager {
    #[must_use]
    pub fn new(
        road: RoadGeometry,
        vehicle: VehicleConfig,
        scene: SceneSize,
        config: ResetConfig,
    ) -> Self {
        Self {
            road,
            vehicle,
            scene,
            config,
        }
    }

    /// Pose at the very start of a run. Straight roads start exactly on the
    /// centre line.
    #[must_use]
    pub fn initial_state(&self) -> VehicleState {
        match &self.road {
            RoadGeometry::Straight(road) => self.straight_start(road.lane_center_x()),
            RoadGeometry::Arc(road) => self.arc_start(road),
        }
    }

    /// Canonical start pose for a new episode.
    pub fn start_state(&self, rng: &mut Rng) -> VehicleState {
        match &self.road {
            RoadGeometry::Straight(road) => {
                let x = road.lane_center_x() + self.jitter(rng);
                self.straight_start(x)
            }
            RoadGeometry::Arc(road) => self.arc_start(road),
        }
    }

    /// The reset this state calls for, if any.
    #[must_use]
    pub fn termination(&self, state: &VehicleState) -> Option<ResetKind> {
        match &self.road {
            RoadGeometry::Straight(road) => self.straight_termination(road, state),
            RoadGeometry::Arc(road) => self.arc_termination(road, state),
        }
    }

    /// Applies any pending reset to `state` and reports the frame's phase.
    pub fn check(&self, state: &mut VehicleState, rng: &mut Rng) -> EpisodePhase {
        let Some(kind) = self.termination(state) else {
            return EpisodePhase::Driving;
        };

        match (&self.road, kind) {
            (RoadGeometry::Straight(road), ResetKind::Wrapped) => {
                state.pos.y = f64::from(self.scene.height) + self.vehicle.half_height();
                state.pos.x = road.lane_center_x() + self.jitter(rng);
            }
            _ => *state = self.start_state(rng),
        }
        tracing::debug!(
            "{} episode reset ({:?}) to ({:.1}, {:.1}) heading {:.1}",
            self.road.kind(),
            kind,
            state.x(),
            state.y(),
            state.heading
        );
        EpisodePhase::Resetting(kind)
    }

    fn jitter(&self, rng: &mut Rng) -> f64 {
        uniform(rng, -self.config.lateral_jitter, self.config.lateral_jitter)
    }

    fn straight_start(&self, x: f64) -> VehicleState {
        let y = f64::from(self.scene.height) - self.vehicle.height - self.config.start_margin;
        VehicleState::new(x, y, HEADING_UP, self.vehicle.nominal_speed)
    }

    fn arc_start(&self, road: &ArcRoad) -> VehicleState {
        let start = road.start_position();
        VehicleState::new(start.x, start.y, road.start_heading, self.vehicle.nominal_speed)
    }

    fn straight_termination(&self, road: &StraightRoad, state: &VehicleState) -> Option<ResetKind> {
        let scene_height = f64::from(self.scene.height);
        if state.y() < -self.vehicle.half_height() {
            Some(ResetKind::Wrapped)
        } else if state.y() > scene_height + self.vehicle.height
            || road.lateral_offset(state).abs() > road.road_width / 2.0
        {
            Some(ResetKind::Restarted)
        } else {
            None
        }
    }

    fn arc_termination(&self, road: &ArcRoad, state: &VehicleState) -> Option<ResetKind> {
        let half_road = road.road_width / 2.0;
        let past_end = road.polar_angle_deg(state.pos) >= road.end_angle;
        let off_radius = road.radial_offset(state.pos).abs() > half_road + self.vehicle.width;
        let past_left = state.x() < road.center.x - road.radius - half_road - self.vehicle.half_width();
        let past_bottom = state.y() > road.center.y + half_road + self.vehicle.half_height();

        (past_end || off_radius || past_left || past_bottom).then_some(ResetKind::Restarted)
    }
}
