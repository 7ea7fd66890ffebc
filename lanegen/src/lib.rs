//! # lanegen
//!
//! Ties the workspace together into a dataset generator.
//!
//! ## The Crates
//!
//! -   **[`physics`]:** Vehicle state, kinematics and road geometry.
//! -   **`render`:** Software rasterizer and camera viewport extraction.
//! -   **[`autopilot`]:** Driving policies, episode resets and the generation
//!     loop.
//! -   **[`dataset`]:** PNG and CSV persistence plus run consolidation.
//! -   **[`scenario`]:** JSON run descriptions.
//!
//! The [`app`] module holds the logic behind the `lanegen` binary.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;

pub use autopilot;
pub use dataset;
pub use physics;
pub use scenario;
