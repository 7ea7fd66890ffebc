#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Lane Simulation Physics
//!
//! The numeric core of the lane-keeping simulator: the vehicle pose, the
//! kinematic model that moves it, and the procedural road layouts it drives
//! on. Nothing in this crate draws or performs I/O; it only transforms state.
//!
//! ## Key Components
//!
//! -   **Vehicle:** [`VehicleState`] holds position, heading and speed.
//!     [`VehicleConfig`] holds the sprite footprint and cruise speed.
//! -   **Kinematics:** [`advance`] and [`apply_steer`] in the [`kinematics`]
//!     module are the only functions that move a vehicle.
//! -   **Roads:** [`RoadGeometry`] is either a [`StraightRoad`] or an
//!     [`ArcRoad`]; both answer offset and on-road queries.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{advance, apply_steer, StraightRoad, VehicleConfig, VehicleState};
//!
//! let road = StraightRoad::new(400.0, 125.0, 250.0);
//! let mut car = VehicleState::new(400.0, 500.0, 90.0, 3.0);
//! apply_steer(&mut car, 2.0);
//! advance(&mut car, 1.0);
//! assert!(road.is_on_road(&car, &VehicleConfig::default()));
//! ```

pub mod angle;
pub mod kinematics;
pub mod road;
pub mod types;

pub use angle::{normalize_degrees, signed_degrees};
pub use glam::DVec2;
pub use kinematics::{advance, apply_steer};
pub use road::{ArcRoad, RoadGeometry, RoadKind, StraightRoad};
pub use types::{SceneSize, VehicleConfig, VehicleState, HEADING_UP};
