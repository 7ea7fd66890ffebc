//! # Generation Loop
//!
//! [`Generator`] owns everything one generation run mutates: the vehicle
//! state, the random source, the episode counters and the renderer. Each
//! [`Generator::step`] runs one fixed-timestep frame in this order:
//!
//! 1.  autopilot picks speed, steering and label from the current state
//! 2.  the kinematic model applies the steering and advances the vehicle
//! 3.  the reset manager ends the episode if needed, moving the vehicle
//! 4.  the camera offset jitter is drawn
//! 5.  if the vehicle is on screen the scene is rendered, the camera frame
//!     extracted and the sample handed to the sink
//!
//! [`Generator::run`] repeats steps until the target sample count is reached
//! or a stop is requested.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};

use fastrand::Rng;
use physics::{advance, apply_steer, RoadGeometry, SceneSize, VehicleConfig, VehicleState};
use render::{CameraConfig, CameraError, CameraExtractor, Rasterizer, SceneRenderer};
use serde::Deserialize;
use thiserror::Error;

use crate::controller::{Autopilot, AutopilotConfig};
use crate::episode::{EpisodeCounters, EpisodePhase, ResetConfig, ResetManager};
use crate::pacing::FramePacer;
use crate::random::uniform;
use crate::recorder::{Recorder, Sample, SampleRecorder};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("camera setup failed: {0}")]
    Camera(#[from] CameraError),
    #[error("sink failed: {0}")]
    Recorder(#[source] Box<dyn Error + Send + Sync>),
    #[error("no sample recorded in {frames} consecutive frames")]
    Stalled { frames: u64 },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub scene: SceneSize,
    pub vehicle: VehicleConfig,
    pub camera: CameraConfig,
    pub autopilot: AutopilotConfig,
    pub reset: ResetConfig,
    /// Simulation timestep in frames
    pub dt: f64,
    /// Off-screen frames tolerated in a row before the run is abandoned
    pub max_consecutive_skips: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scene: SceneSize::default(),
            vehicle: VehicleConfig::default(),
            camera: CameraConfig::default(),
            autopilot: AutopilotConfig::default(),
            reset: ResetConfig::default(),
            dt: 1.0,
            max_consecutive_skips: 10_000,
        }
    }
}

/// What a single frame produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub phase: EpisodePhase,
    /// Index and label of the sample written this frame
    pub recorded: Option<(u64, f64)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOptions {
    pub target_samples: u64,
    /// Frame rate to hold, unpaced when `None`
    pub pace_fps: Option<f64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples recorded during this call
    pub samples: u64,
    /// Frames simulated during this call
    pub frames: u64,
    /// Episodes completed during this call
    pub episodes: u64,
    /// True when the stop flag ended the run early
    pub cancelled: bool,
}

pub struct Generator<R: SceneRenderer = Rasterizer> {
    config: GeneratorConfig,
    road: RoadGeometry,
    state: VehicleState,
    rng: Rng,
    autopilot: Autopilot,
    resets: ResetManager,
    camera: CameraExtractor,
    recorder: SampleRecorder,
    renderer: R,
    counters: EpisodeCounters,
    consecutive_skips: u64,
}

impl Generator<Rasterizer> {
    /// Generator drawing its scenes with the built-in rasterizer.
    ///
    /// # Errors
    ///
    /// See [`Generator::new`].
    pub fn rasterized(
        config: GeneratorConfig,
        road: RoadGeometry,
        seed: Option<u64>,
    ) -> Result<Self, GeneratorError> {
        let renderer = Rasterizer::new(config.scene, config.vehicle.clone());
        Self::new(config, road, renderer, seed)
    }
}

impl<R: SceneRenderer> Generator<R> {
    /// Builds a generator positioned at the road's start pose. Without a
    /// seed the random source is seeded from entropy.
    ///
    /// # Errors
    ///
    /// Fails if the camera window does not fit the scene.
    pub fn new(
        config: GeneratorConfig,
        road: RoadGeometry,
        renderer: R,
        seed: Option<u64>,
    ) -> Result<Self, GeneratorError> {
        let camera = CameraExtractor::new(config.camera.clone(), config.scene)?;
        let rng = seed.map_or_else(Rng::new, Rng::with_seed);
        let autopilot = Autopilot::for_road(&road, &config.vehicle, &config.autopilot);
        let resets = ResetManager::new(
            road,
            config.vehicle.clone(),
            config.scene,
            config.reset.clone(),
        );
        let recorder = SampleRecorder::new(config.scene, &config.vehicle);
        let state = resets.initial_state();

        Ok(Self {
            config,
            road,
            state,
            rng,
            autopilot,
            resets,
            camera,
            recorder,
            renderer,
            counters: EpisodeCounters::default(),
            consecutive_skips: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[must_use]
    pub fn road(&self) -> &RoadGeometry {
        &self.road
    }

    #[must_use]
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    #[must_use]
    pub fn counters(&self) -> EpisodeCounters {
        self.counters
    }

    /// Index the next recorded sample will receive.
    #[must_use]
    pub fn next_sample_index(&self) -> u64 {
        self.recorder.next_index()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Fails when the sink rejects a sample, when the camera cannot sample
    /// the rendered scene, or when too many frames in a row were off screen.
    pub fn step<S: Recorder>(&mut self, sink: &mut S) -> Result<StepOutcome, GeneratorError> {
        let actuation = self.autopilot.command(&self.state, &mut self.rng);
        self.state.speed = actuation.speed;
        apply_steer(&mut self.state, actuation.steer);
        advance(&mut self.state, self.config.dt);

        let phase = self.resets.check(&mut self.state, &mut self.rng);
        self.counters.advance(phase);

        let jitter = self.config.camera.offset_jitter;
        let offset_y = self.config.camera.offset_y + uniform(&mut self.rng, -jitter, jitter);

        if !self.recorder.accepts(&self.state) {
            self.consecutive_skips += 1;
            tracing::debug!(
                "frame {} skipped, vehicle off screen at ({:.1}, {:.1})",
                self.counters.frame,
                self.state.x(),
                self.state.y()
            );
            if self.consecutive_skips > self.config.max_consecutive_skips {
                return Err(GeneratorError::Stalled {
                    frames: self.consecutive_skips,
                });
            }
            return Ok(StepOutcome {
                phase,
                recorded: None,
            });
        }

        let scene = self.renderer.render(&self.road, &self.state);
        let frame = self.camera.extract(scene, &self.state, offset_y)?;
        let sample = Sample {
            frame,
            label: actuation.label,
        };
        let index = self
            .recorder
            .record(sink, &sample)
            .map_err(|e| GeneratorError::Recorder(Box::new(e)))?;
        self.consecutive_skips = 0;

        Ok(StepOutcome {
            phase,
            recorded: Some((index, sample.label)),
        })
    }

    /// Steps until `options.target_samples` samples were recorded by this
    /// call or `stop` is raised. The flag is checked before every frame, so a
    /// stop never splits a sample.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Generator::step`]. Samples recorded
    /// before the error stay in the sink.
    pub fn run<S: Recorder>(
        &mut self,
        mut sink: S,
        options: &RunOptions,
        stop: &AtomicBool,
    ) -> Result<RunSummary, GeneratorError> {
        let mut pacer = options.pace_fps.and_then(FramePacer::new);
        let start_episode = self.counters.episode;
        let mut summary = RunSummary::default();

        tracing::info!(
            "Generating {} samples on {} road starting at index {}",
            options.target_samples,
            self.road.kind(),
            self.recorder.next_index()
        );

        while summary.samples < options.target_samples {
            if stop.load(Ordering::Relaxed) {
                summary.cancelled = true;
                tracing::info!("Stop requested after {} samples", summary.samples);
                break;
            }

            let outcome = self.step(&mut sink)?;
            summary.frames += 1;
            if outcome.recorded.is_some() {
                summary.samples += 1;
                if summary.samples % 100 == 0 {
                    tracing::info!(
                        "Recorded {}/{} samples (frame {}, episode {})",
                        summary.samples,
                        options.target_samples,
                        self.counters.frame,
                        self.counters.episode
                    );
                }
            }

            if let Some(pacer) = pacer.as_mut() {
                pacer.wait();
            }
        }

        summary.episodes = self.counters.episode - start_episode;
        tracing::info!(
            "Generation finished: {} samples over {} frames, {} episodes",
            summary.samples,
            summary.frames,
            summary.episodes
        );
        Ok(summary)
    }
}
