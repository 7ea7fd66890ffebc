//! # Autopilot
//!
//! Drives a simulated vehicle along a procedural road and turns what its
//! camera sees into labeled lane-keeping samples.
//!
//! ## Key Components
//!
//! -   **[`Autopilot`]:** Straight-road corrective policy and arc pure-pursuit
//!     policy. Both actuate the vehicle and produce the steering label.
//! -   **[`ResetManager`]:** Detects episode termination and returns the
//!     vehicle to a valid start pose in the same frame.
//! -   **[`SampleRecorder`] / [`Recorder`]:** The recording predicate and the
//!     sink that persists accepted samples.
//! -   **[`Generator`]:** The fixed-timestep loop tying it all together around
//!     a single seedable random source.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use autopilot::{Generator, GeneratorConfig, MemoryRecorder, RunOptions};
//! use physics::{ArcRoad, DVec2, RoadGeometry};
//!
//! let road = RoadGeometry::Arc(ArcRoad::new(DVec2::new(400.0, 300.0), 200.0, 90.0, 180.0));
//! let mut generator = Generator::rasterized(GeneratorConfig::default(), road, Some(7)).unwrap();
//! let mut sink = MemoryRecorder::new();
//! let options = RunOptions { target_samples: 50, pace_fps: None };
//! generator.run(&mut sink, &options, &AtomicBool::new(false)).unwrap();
//! assert_eq!(sink.len(), 50);
//! ```

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod episode;
pub mod generator;
pub mod pacing;
pub mod random;
pub mod recorder;

pub use controller::{
    straight_label, Actuation, Autopilot, AutopilotConfig, Policy, PursuitConfig, PursuitPolicy,
    PursuitTrack, StraightPolicy, StraightPolicyConfig,
};
pub use episode::{EpisodeCounters, EpisodePhase, ResetConfig, ResetKind, ResetManager};
pub use generator::{Generator, GeneratorConfig, GeneratorError, RunOptions, RunSummary, StepOutcome};
pub use pacing::FramePacer;
pub use recorder::{MemoryRecorder, Recorder, Sample, SampleRecorder};
