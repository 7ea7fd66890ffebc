//! Sample recording: the recording predicate plus the sink seam that
//! persistence plugs into.

use std::convert::Infallible;

use physics::{DVec2, SceneSize, VehicleConfig, VehicleState};
use render::CameraFrame;

/// One labeled training sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub frame: CameraFrame,
    /// Steering label in degrees
    pub label: f64,
}

/// Destination for accepted samples.
///
/// `record` must either persist the whole sample or fail; the index only
/// advances after it returns `Ok`.
pub trait Recorder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn record(&mut self, index: u64, sample: &Sample) -> Result<(), Self::Error>;
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    type Error = R::Error;

    fn record(&mut self, index: u64, sample: &Sample) -> Result<(), Self::Error> {
        (**self).record(index, sample)
    }
}

/// Keeps every sample in memory. Used by tests and benches.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    pub samples: Vec<(u64, Sample)>,
}

impl MemoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|(_, sample)| sample.label)
    }
}

impl Recorder for MemoryRecorder {
    type Error = Infallible;

    fn record(&mut self, index: u64, sample: &Sample) -> Result<(), Self::Error> {
        self.samples.push((index, sample.clone()));
        Ok(())
    }
}

/// Decides which frames become samples and numbers the ones that do.
#[derive(Clone, Debug)]
pub struct SampleRecorder {
    scene: SceneSize,
    margin: DVec2,
    next_index: u64,
}

impl SampleRecorder {
    #[must_use]
    pub fn new(scene: SceneSize, vehicle: &VehicleConfig) -> Self {
        Self {
            scene,
            margin: DVec2::new(vehicle.half_width(), vehicle.half_height()),
            next_index: 0,
        }
    }

    /// True when the vehicle is on screen, allowing half a body of overhang.
    #[must_use]
    pub fn accepts(&self, state: &VehicleState) -> bool {
        self.scene.contains_with_margin(state.pos, self.margin)
    }

    /// Index the next accepted sample will receive.
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Hands the sample to the sink and returns the index it was stored under.
    ///
    /// # Errors
    ///
    /// Returns the sink's error; the index is not consumed in that case.
    pub fn record<R: Recorder>(&mut self, sink: &mut R, sample: &Sample) -> Result<u64, R::Error> {
        let index = self.next_index;
        sink.record(index, sample)?;
        self.next_index += 1;
        Ok(index)
    }
}
