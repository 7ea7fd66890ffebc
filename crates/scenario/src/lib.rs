//! # Scenario
//!
//! JSON description of a generation run. Every field has a default, so `{}`
//! describes the stock arc run: an 800x600 scene, a 200 px arc from 90 to
//! 180 degrees and 5000 samples.
//!
//! ```json
//! {
//!   "road": { "kind": "straight" },
//!   "camera": { "offset_jitter": 0.0 },
//!   "run": { "samples": 1000, "seed": 7, "output_dir": "data/run_straight" }
//! }
//! ```
//!
//! Besides `road` and `run`, the top-level keys are those of
//! [`autopilot::GeneratorConfig`]: `scene`, `vehicle`, `camera`, `autopilot`,
//! `reset`, `dt` and `max_consecutive_skips`.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use autopilot::{FramePacer, Generator, GeneratorConfig, GeneratorError};
use physics::{normalize_degrees, ArcRoad, DVec2, RoadGeometry, StraightRoad, HEADING_UP};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

const DEFAULT_LANE_WIDTH: f64 = 125.0;
const DEFAULT_ROAD_WIDTH: f64 = 250.0;

fn lane_width() -> f64 {
    DEFAULT_LANE_WIDTH
}

fn road_width() -> f64 {
    DEFAULT_ROAD_WIDTH
}

fn arc_center() -> [f64; 2] {
    [400.0, 300.0]
}

fn arc_radius() -> f64 {
    200.0
}

const STOCK_START_ANGLE: f64 = 90.0;

fn start_angle() -> f64 {
    STOCK_START_ANGLE
}

fn end_angle() -> f64 {
    180.0
}

/// Heading an arc episode starts with when the scenario leaves it out.
/// The stock arc starts facing up-screen; any other arc starts on the
/// counter-clockwise tangent at its start angle.
#[must_use]
pub fn default_start_heading(start_angle: f64) -> f64 {
    if (start_angle - STOCK_START_ANGLE).abs() < f64::EPSILON {
        HEADING_UP
    } else {
        normalize_degrees(start_angle + 90.0)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoadSpec {
    Straight {
        /// Defaults to the middle of the scene
        #[serde(default)]
        center_x: Option<f64>,
        #[serde(default = "lane_width")]
        lane_width: f64,
        #[serde(default = "road_width")]
        road_width: f64,
    },
    #[serde(alias = "curved")]
    Arc {
        #[serde(default = "arc_center")]
        center: [f64; 2],
        #[serde(default = "arc_radius")]
        radius: f64,
        #[serde(default = "start_angle")]
        start_angle: f64,
        #[serde(default = "end_angle")]
        end_angle: f64,
        #[serde(default = "lane_width")]
        lane_width: f64,
        #[serde(default = "road_width")]
        road_width: f64,
        /// Defaults to [`default_start_heading`]
        #[serde(default)]
        start_heading: Option<f64>,
    },
}

impl Default for RoadSpec {
    fn default() -> Self {
        Self::Arc {
            center: arc_center(),
            radius: arc_radius(),
            start_angle: start_angle(),
            end_angle: end_angle(),
            lane_width: lane_width(),
            road_width: road_width(),
            start_heading: None,
        }
    }
}

impl RoadSpec {
    /// Straight road through the middle of a scene `scene_width` wide.
    #[must_use]
    pub fn straight() -> Self {
        Self::Straight {
            center_x: None,
            lane_width: lane_width(),
            road_width: road_width(),
        }
    }

    #[must_use]
    pub fn arc() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunSettings {
    /// Samples to record
    pub samples: u64,
    /// Random seed; entropy when absent
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    /// Frame rate to hold; unpaced when absent
    pub pace_fps: Option<f64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            samples: 5000,
            seed: None,
            output_dir: PathBuf::from("data/run_001"),
            pace_fps: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub road: RoadSpec,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(flatten)]
    pub generator: GeneratorConfig,
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(json)?)
    }
}

fn invalid(message: impl Into<String>) -> ScenarioError {
    ScenarioError::Invalid(message.into())
}

fn require(condition: bool, message: &str) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(invalid(message))
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl Scenario {
    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid scenario.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        json.parse()
    }

    /// Checks the values serde cannot: sizes, ranges and probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let g = &self.generator;
        require(g.scene.width > 0 && g.scene.height > 0, "scene size must be positive")?;
        require(
            g.vehicle.width > 0.0 && g.vehicle.height > 0.0,
            "vehicle size must be positive",
        )?;
        require(g.vehicle.nominal_speed > 0.0, "vehicle.nominal_speed must be positive")?;
        require(g.camera.width > 0 && g.camera.height > 0, "camera size must be positive")?;
        require(
            g.camera.width <= g.scene.width && g.camera.height <= g.scene.height,
            "camera must fit inside the scene",
        )?;
        require(g.camera.offset_jitter >= 0.0, "camera.offset_jitter must not be negative")?;
        require(g.dt > 0.0, "dt must be positive")?;

        let straight = &g.autopilot.straight;
        require(
            is_probability(straight.perturb_probability),
            "autopilot.straight.perturb_probability must lie in [0, 1]",
        )?;
        require(
            0.0 <= straight.perturb_min && straight.perturb_min <= straight.perturb_max,
            "autopilot.straight perturbation range is inverted",
        )?;
        require(
            straight.heading_tolerance >= 0.0,
            "autopilot.straight.heading_tolerance must not be negative",
        )?;

        let pursuit = &g.autopilot.pursuit;
        require(pursuit.look_ahead > 0.0, "autopilot.pursuit.look_ahead must be positive")?;
        require(
            is_probability(pursuit.noise_probability),
            "autopilot.pursuit.noise_probability must lie in [0, 1]",
        )?;
        require(
            pursuit.noise_magnitude >= 0.0,
            "autopilot.pursuit.noise_magnitude must not be negative",
        )?;
        require(
            (0.0..1.0).contains(&g.autopilot.speed_variation),
            "autopilot.speed_variation must lie in [0, 1)",
        )?;
        require(g.reset.lateral_jitter >= 0.0, "reset.lateral_jitter must not be negative")?;

        match &self.road {
            RoadSpec::Straight {
                lane_width,
                road_width,
                ..
            } => check_widths(*lane_width, *road_width)?,
            RoadSpec::Arc {
                radius,
                start_angle,
                end_angle,
                lane_width,
                road_width,
                ..
            } => {
                check_widths(*lane_width, *road_width)?;
                require(*radius > 0.0, "road.radius must be positive")?;
                require(
                    (0.0..360.0).contains(start_angle),
                    "road.start_angle must lie in [0, 360)",
                )?;
                require(
                    *end_angle > *start_angle && *end_angle <= 360.0,
                    "road.end_angle must exceed road.start_angle and not exceed 360",
                )?;
            }
        }

        require(self.run.samples > 0, "run.samples must be positive")?;
        if let Some(fps) = self.run.pace_fps {
            require(
                FramePacer::new(fps).is_some(),
                "run.pace_fps must be a positive, representable frame rate",
            )?;
        }
        Ok(())
    }

    #[must_use]
    pub fn build_road(&self) -> RoadGeometry {
        match self.road {
            RoadSpec::Straight {
                center_x,
                lane_width,
                road_width,
            } => {
                let center_x = center_x.unwrap_or(f64::from(self.generator.scene.width) / 2.0);
                RoadGeometry::Straight(StraightRoad::new(center_x, lane_width, road_width))
            }
            RoadSpec::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                lane_width,
                road_width,
                start_heading,
            } => {
                let mut arc = ArcRoad::new(
                    DVec2::new(center[0], center[1]),
                    radius,
                    start_angle,
                    end_angle,
                );
                arc.lane_width = lane_width;
                arc.road_width = road_width;
                arc.start_heading =
                    start_heading.unwrap_or_else(|| default_start_heading(start_angle));
                RoadGeometry::Arc(arc)
            }
        }
    }

    /// Validates the scenario and builds its generator.
    ///
    /// # Errors
    ///
    /// Fails if validation fails or the generator rejects the configuration.
    pub fn build_generator(&self) -> Result<Generator, ScenarioError> {
        self.validate()?;
        Ok(Generator::rasterized(
            self.generator.clone(),
            self.build_road(),
            self.run.seed,
        )?)
    }
}

fn check_widths(lane_width: f64, road_width: f64) -> Result<(), ScenarioError> {
    require(
        lane_width > 0.0 && road_width > 0.0,
        "road widths must be positive",
    )?;
    require(lane_width <= road_width, "road.lane_width must not exceed road.road_width")
}
