//! # Road Geometry
//!
//! Procedural road layouts the vehicle drives on. Two shapes exist:
//!
//! -   [`StraightRoad`]: a vertical corridor of constant width, centred on a
//!     fixed x coordinate and unbounded along y.
//! -   [`ArcRoad`]: a circular segment around a centre point, travelled
//!     counter-clockwise (increasing polar angle) from the start angle to the
//!     end angle.
//!
//! Positions are in screen space (y down). Polar angles are measured in the
//! usual math convention, so the screen y delta is negated before `atan2`.

use glam::DVec2;

use crate::angle::normalize_degrees;
use crate::types::{VehicleConfig, VehicleState};

/// Slack on the arc's angular window so a vehicle placed exactly on the start
/// angle is not rejected by `to_degrees` rounding.
const ANGLE_EPSILON_DEG: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoadKind {
    Straight,
    Arc,
}

impl std::fmt::Display for RoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadKind::Straight => f.write_str("straight"),
            RoadKind::Arc => f.write_str("arc"),
        }
    }
}

/// Straight two-lane corridor running along the y axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StraightRoad {
    pub center_x: f64,
    pub lane_width: f64,
    pub road_width: f64,
}

impl StraightRoad {
    #[must_use]
    pub fn new(center_x: f64, lane_width: f64, road_width: f64) -> Self {
        Self {
            center_x,
            lane_width,
            road_width,
        }
    }

    #[must_use]
    pub fn lane_center_x(&self) -> f64 {
        self.center_x
    }

    /// Signed distance from the centre line; positive means right of centre.
    #[must_use]
    pub fn lateral_offset(&self, state: &VehicleState) -> f64 {
        state.x() - self.lane_center_x()
    }

    #[must_use]
    pub fn is_on_road(&self, state: &VehicleState, vehicle: &VehicleConfig) -> bool {
        self.lateral_offset(state).abs() <= self.road_width / 2.0 - vehicle.half_width()
    }

    /// Leftmost and rightmost x the vehicle centre may take while its body
    /// stays on the asphalt.
    #[must_use]
    pub fn safe_bounds(&self, vehicle: &VehicleConfig) -> (f64, f64) {
        let reach = self.road_width / 2.0 - vehicle.half_width();
        (self.center_x - reach, self.center_x + reach)
    }

    /// x of the dashed marker (left lane) and the solid marker (right lane).
    #[must_use]
    pub fn marker_xs(&self) -> (f64, f64) {
        let left_edge = self.center_x - self.road_width / 2.0;
        let right_edge = self.center_x + self.road_width / 2.0;
        (
            left_edge + self.lane_width / 2.0,
            right_edge - self.lane_width / 2.0,
        )
    }
}

/// Circular road segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArcRoad {
    pub center: DVec2,
    pub radius: f64,
    /// Polar angle where episodes begin, degrees
    pub start_angle: f64,
    /// Polar angle where episodes end, degrees
    pub end_angle: f64,
    pub lane_width: f64,
    pub road_width: f64,
    /// Heading given to the vehicle when an episode restarts
    pub start_heading: f64,
}

impl ArcRoad {
    #[must_use]
    pub fn new(center: DVec2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            lane_width: 125.0,
            road_width: 250.0,
            start_heading: 90.0,
        }
    }

    /// Offset from the centre with y flipped into math orientation.
    #[must_use]
    pub fn relative(&self, pos: DVec2) -> DVec2 {
        DVec2::new(pos.x - self.center.x, -(pos.y - self.center.y))
    }

    /// Polar angle of `pos` about the centre in radians, in `(-pi, pi]`.
    #[must_use]
    pub fn polar_angle(&self, pos: DVec2) -> f64 {
        let rel = self.relative(pos);
        rel.y.atan2(rel.x)
    }

    /// Polar angle of `pos` in degrees, wrapped into `[0, 360)`.
    #[must_use]
    pub fn polar_angle_deg(&self, pos: DVec2) -> f64 {
        normalize_degrees(self.polar_angle(pos).to_degrees())
    }

    #[must_use]
    pub fn distance_from_center(&self, pos: DVec2) -> f64 {
        self.relative(pos).length()
    }

    /// Positive outside the ideal circle, negative inside.
    #[must_use]
    pub fn radial_offset(&self, pos: DVec2) -> f64 {
        self.distance_from_center(pos) - self.radius
    }

    /// Screen position on the ideal circle at polar angle `angle` (radians).
    #[must_use]
    pub fn point_at(&self, angle: f64) -> DVec2 {
        DVec2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y - self.radius * angle.sin(),
        )
    }

    #[must_use]
    pub fn contains_angle(&self, polar_deg: f64) -> bool {
        polar_deg >= self.start_angle - ANGLE_EPSILON_DEG && polar_deg < self.end_angle
    }

    #[must_use]
    pub fn is_within_arc(&self, state: &VehicleState) -> bool {
        self.contains_angle(self.polar_angle_deg(state.pos))
            && self.radial_offset(state.pos).abs() <= self.road_width / 2.0
    }

    /// Where an episode on this arc begins.
    #[must_use]
    pub fn start_position(&self) -> DVec2 {
        self.point_at(self.start_angle.to_radians())
    }
}

/// Road layout for one generation run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RoadGeometry {
    Straight(StraightRoad),
    Arc(ArcRoad),
}

impl RoadGeometry {
    #[must_use]
    pub fn kind(&self) -> RoadKind {
        match self {
            RoadGeometry::Straight(_) => RoadKind::Straight,
            RoadGeometry::Arc(_) => RoadKind::Arc,
        }
    }

    #[must_use]
    pub fn lane_width(&self) -> f64 {
        match self {
            RoadGeometry::Straight(road) => road.lane_width,
            RoadGeometry::Arc(road) => road.lane_width,
        }
    }

    #[must_use]
    pub fn road_width(&self) -> f64 {
        match self {
            RoadGeometry::Straight(road) => road.road_width,
            RoadGeometry::Arc(road) => road.road_width,
        }
    }

    /// Signed deviation from the ideal path: lateral offset on a straight,
    /// radial offset on an arc.
    #[must_use]
    pub fn path_offset(&self, state: &VehicleState) -> f64 {
        match self {
            RoadGeometry::Straight(road) => road.lateral_offset(state),
            RoadGeometry::Arc(road) => road.radial_offset(state.pos),
        }
    }

    /// `is_on_road` for a straight, `is_within_arc` for an arc.
    #[must_use]
    pub fn is_on_road(&self, state: &VehicleState, vehicle: &VehicleConfig) -> bool {
        match self {
            RoadGeometry::Straight(road) => road.is_on_road(state, vehicle),
            RoadGeometry::Arc(road) => road.is_within_arc(state),
        }
    }
}
