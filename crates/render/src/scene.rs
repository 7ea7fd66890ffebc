//! Scene contract between the rasterizer and the camera
//!
//! The camera only needs a pixel grid of known size that can be sampled per
//! pixel. Any rasterizer that produces one can feed the extractor.

use image::RgbImage;
use physics::{RoadGeometry, VehicleState};

/// A rendered frame that can be queried for RGB colours.
pub trait PixelSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Colour at column `x`, row `y`. Callers stay inside `dimensions`.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

/// Draws the road and the vehicle for one frame.
pub trait SceneRenderer {
    type Scene: PixelSource;

    /// Paints `road` with the vehicle at `vehicle` and returns the frame.
    fn render(&mut self, road: &RoadGeometry, vehicle: &VehicleState) -> &Self::Scene;
}
