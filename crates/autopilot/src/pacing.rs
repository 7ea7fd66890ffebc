use std::thread;
use std::time::{Duration, Instant};

/// Sleeps between frames to hold a target frame rate.
#[derive(Debug)]
pub struct FramePacer {
    frame_duration: Duration,
    last_frame: Instant,
}

impl FramePacer {
    /// `None` for a non-positive or non-finite rate, or one so low that a
    /// frame would not fit in a [`Duration`].
    #[must_use]
    pub fn new(fps: f64) -> Option<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
        let frame_duration = Duration::try_from_secs_f64(1.0 / fps).ok()?;
        Some(Self {
            frame_duration,
            last_frame: Instant::now(),
        })
    }

    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Blocks until one frame duration has passed since the previous call.
    pub fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_duration {
            thread::sleep(self.frame_duration - elapsed);
        }
        self.last_frame = Instant::now();
    }
}
