//! Camera viewport extraction
//!
//! The "camera" is a fixed-size window cut out of the rendered scene, anchored
//! on the vehicle. It does not rotate with the vehicle: the model learns from
//! how the lane markings sit inside an upright window.
//!
//! Extraction clamps the window into the scene and then converts it to a
//! single luminance channel scaled to `[0, 1]`.

use image::{GrayImage, Luma};
use physics::{SceneSize, VehicleState};
use serde::Deserialize;

use crate::error::CameraError;
use crate::scene::PixelSource;

/// ITU-R 601 luma weights for R, G, B
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// Camera window size and placement relative to the vehicle
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical offset of the window's top edge from the vehicle centre.
    /// Negative values place the window ahead of an upward-facing vehicle.
    pub offset_y: f64,
    /// Half-range of the uniform per-frame perturbation of `offset_y`
    pub offset_jitter: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            offset_y: -70.0,
            offset_jitter: 10.0,
        }
    }
}

/// Integer window into the scene, top-left anchored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Window of `width x height` centred horizontally on the vehicle with its
    /// top edge at `vehicle.y + offset_y`, clamped so it lies inside `scene`.
    ///
    /// The window must not be larger than the scene.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn anchored(
        state: &VehicleState,
        offset_y: f64,
        width: u32,
        height: u32,
        scene: SceneSize,
    ) -> Self {
        let max_x = f64::from(scene.width.saturating_sub(width));
        let max_y = f64::from(scene.height.saturating_sub(height));
        let x = clamp_coordinate(state.x() - f64::from(width) / 2.0, max_x);
        let y = clamp_coordinate(state.y() + offset_y, max_y);
        Self {
            x: x as u32,
            y: y as u32,
            width,
            height,
        }
    }

    /// True when the window lies fully inside `scene`.
    #[must_use]
    pub fn fits(&self, scene: SceneSize) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(scene.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(scene.height)
    }
}

/// Clamps into `[0, max]`, truncating like a pixel rect. Non-finite input
/// lands on the nearest bound.
fn clamp_coordinate(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max).floor()
}

/// Single-channel camera image, row-major, values in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFrame {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CameraFrame {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(rows, cols)`, the layout the training side consumes.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    /// Intensity at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height` or `col >= width`.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> f32 {
        assert!(
            row < self.height && col < self.width,
            "pixel ({row}, {col}) outside {}x{} frame",
            self.width,
            self.height
        );
        self.data[row as usize * self.width as usize + col as usize]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// 8-bit grayscale copy; values are scaled by 255 and truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([(self.get(y, x) * 255.0).clamp(0.0, 255.0) as u8])
        })
    }
}

/// Cuts camera frames out of rendered scenes of one fixed size.
#[derive(Clone, Debug)]
pub struct CameraExtractor {
    config: CameraConfig,
    scene: SceneSize,
}

impl CameraExtractor {
    /// # Errors
    ///
    /// Fails if the camera window has zero area or is larger than the scene.
    pub fn new(config: CameraConfig, scene: SceneSize) -> Result<Self, CameraError> {
        if config.width == 0 || config.height == 0 {
            return Err(CameraError::EmptyCamera);
        }
        if config.width > scene.width || config.height > scene.height {
            return Err(CameraError::CameraLargerThanScene {
                camera_width: config.width,
                camera_height: config.height,
                scene_width: scene.width,
                scene_height: scene.height,
            });
        }
        Ok(Self { config, scene })
    }

    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self, state: &VehicleState, offset_y: f64) -> Viewport {
        Viewport::anchored(
            state,
            offset_y,
            self.config.width,
            self.config.height,
            self.scene,
        )
    }

    /// Crops the window for `state` out of `scene` and converts it to
    /// normalized luminance.
    ///
    /// # Errors
    ///
    /// Fails only if `scene` is not the size this extractor was built for.
    #[allow(clippy::cast_possible_truncation)]
    pub fn extract<S>(
        &self,
        scene: &S,
        state: &VehicleState,
        offset_y: f64,
    ) -> Result<CameraFrame, CameraError>
    where
        S: PixelSource + ?Sized,
    {
        let (actual_width, actual_height) = scene.dimensions();
        if (actual_width, actual_height) != (self.scene.width, self.scene.height) {
            return Err(CameraError::SceneSizeMismatch {
                expected_width: self.scene.width,
                expected_height: self.scene.height,
                actual_width,
                actual_height,
            });
        }

        let view = self.viewport(state, offset_y);
        let mut data = Vec::with_capacity(view.width as usize * view.height as usize);
        for row in 0..view.height {
            for col in 0..view.width {
                let [r, g, b] = scene.rgb(view.x + col, view.y + row);
                let luma = LUMA_WEIGHTS[0] * f64::from(r)
                    + LUMA_WEIGHTS[1] * f64::from(g)
                    + LUMA_WEIGHTS[2] * f64::from(b);
                data.push((luma / 255.0) as f32);
            }
        }

        Ok(CameraFrame {
            width: view.width,
            height: view.height,
            data,
        })
    }
}
