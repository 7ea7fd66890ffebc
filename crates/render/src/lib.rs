#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Scene Rendering and Camera
//!
//! -   [`Rasterizer`] paints the top-down road scene and the vehicle sprite
//!     into an RGB image on the CPU.
//! -   [`CameraExtractor`] cuts the vehicle-anchored camera window out of any
//!     [`PixelSource`] and turns it into a normalized [`CameraFrame`].

pub mod camera;
pub mod error;
pub mod rasterizer;
pub mod scene;

pub use camera::{CameraConfig, CameraExtractor, CameraFrame, Viewport, LUMA_WEIGHTS};
pub use error::CameraError;
pub use rasterizer::{vehicle_corners, Rasterizer};
pub use scene::{PixelSource, SceneRenderer};
