use glam::DVec2;
use serde::Deserialize;

use crate::angle::normalize_degrees;

/// Heading that points straight up the screen.
pub const HEADING_UP: f64 = 90.0;

/// Pose of the simulated vehicle in screen space.
///
/// `pos.y` grows downward. `heading` is in degrees, counter-clockwise from the
/// +x axis, and always kept in `[0, 360)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub pos: DVec2,
    pub heading: f64,
    pub speed: f64,
}

impl VehicleState {
    #[must_use]
    pub fn new(x: f64, y: f64, heading: f64, speed: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            heading: normalize_degrees(heading),
            speed,
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// Unit vector along the heading, in screen coordinates.
    #[must_use]
    pub fn forward(&self) -> DVec2 {
        let rad = self.heading.to_radians();
        DVec2::new(rad.cos(), -rad.sin())
    }
}

/// Footprint and cruise speed of the vehicle
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleConfig {
    /// Sprite width across the heading, in pixels
    pub width: f64,
    /// Sprite length along the heading, in pixels
    pub height: f64,
    /// Distance covered per frame at nominal speed
    pub nominal_speed: f64,
}

impl VehicleConfig {
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    #[must_use]
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 50.0,
            nominal_speed: 3.0,
        }
    }
}

/// Size of the rendered scene in pixels.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SceneSize {
    pub width: u32,
    pub height: u32,
}

impl SceneSize {
    /// True when `pos` lies within the scene grown by `margin` on every side.
    #[must_use]
    pub fn contains_with_margin(&self, pos: DVec2, margin: DVec2) -> bool {
        pos.x >= -margin.x
            && pos.x <= f64::from(self.width) + margin.x
            && pos.y >= -margin.y
            && pos.y <= f64::from(self.height) + margin.y
    }
}

impl Default for SceneSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}
