//! CPU rasterizer for the top-down road scene
//!
//! Paints the road surface, its lane markings and the vehicle sprite into an
//! [`RgbImage`]. The road never changes during a run, so it is painted once
//! into a cached layer and each frame starts from a copy of it.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use physics::{
    normalize_degrees, ArcRoad, DVec2, RoadGeometry, SceneSize, StraightRoad, VehicleConfig,
    VehicleState,
};

use crate::scene::SceneRenderer;

pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
pub const ROAD_GRAY: Rgb<u8> = Rgb([100, 100, 100]);
pub const MARKER_WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const MARKER_YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const VEHICLE_BLUE: Rgb<u8> = Rgb([0, 0, 200]);

/// Lane marking stroke width in pixels
pub const MARKER_WIDTH: f64 = 5.0;
/// Straight dashes repeat every this many pixels
const DASH_PERIOD_PX: u32 = 15;
const DASH_LENGTH_PX: u32 = 10;
/// Arc dashes: 5 degrees painted, 5 degrees gap
const ARC_DASH_DEG: f64 = 5.0;

/// Software renderer producing the scene the camera samples.
pub struct Rasterizer {
    size: SceneSize,
    vehicle: VehicleConfig,
    road_layer: RgbImage,
    cached_road: Option<RoadGeometry>,
    frame: RgbImage,
}

impl Rasterizer {
    #[must_use]
    pub fn new(size: SceneSize, vehicle: VehicleConfig) -> Self {
        Self {
            size,
            vehicle,
            road_layer: RgbImage::from_pixel(size.width, size.height, BACKGROUND),
            cached_road: None,
            frame: RgbImage::from_pixel(size.width, size.height, BACKGROUND),
        }
    }

    #[must_use]
    pub fn size(&self) -> SceneSize {
        self.size
    }

    /// Last frame produced by [`SceneRenderer::render`].
    #[must_use]
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    fn ensure_road_layer(&mut self, road: &RoadGeometry) {
        if self.cached_road.as_ref() == Some(road) {
            return;
        }
        let mut layer = RgbImage::from_pixel(self.size.width, self.size.height, BACKGROUND);
        match road {
            RoadGeometry::Straight(straight) => paint_straight(&mut layer, straight),
            RoadGeometry::Arc(arc) => paint_arc(&mut layer, arc),
        }
        tracing::debug!("Painted {} road layer", road.kind());
        self.road_layer = layer;
        self.cached_road = Some(*road);
    }
}

impl SceneRenderer for Rasterizer {
    type Scene = RgbImage;

    fn render(&mut self, road: &RoadGeometry, vehicle: &VehicleState) -> &RgbImage {
        self.ensure_road_layer(road);
        self.frame.copy_from_slice(self.road_layer.as_raw());
        paint_vehicle(&mut self.frame, vehicle, &self.vehicle);
        &self.frame
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn paint_straight(img: &mut RgbImage, road: &StraightRoad) {
    let height = img.height();
    let left_edge = road.center_x - road.road_width / 2.0;
    draw_filled_rect_mut(
        img,
        Rect::at(left_edge as i32, 0).of_size(road.road_width as u32, height),
        ROAD_GRAY,
    );

    let (dashed_x, solid_x) = road.marker_xs();
    let stroke = MARKER_WIDTH as u32;
    let half_stroke = MARKER_WIDTH / 2.0;
    for y in (0..height).step_by(DASH_PERIOD_PX as usize) {
        draw_filled_rect_mut(
            img,
            Rect::at((dashed_x - half_stroke) as i32, y as i32).of_size(stroke, DASH_LENGTH_PX),
            MARKER_WHITE,
        );
    }
    draw_filled_rect_mut(
        img,
        Rect::at((solid_x - half_stroke) as i32, 0).of_size(stroke, height),
        MARKER_YELLOW,
    );
}

/// Colour of the arc road at a point, or `None` off the asphalt.
fn arc_color_at(arc: &ArcRoad, pos: DVec2) -> Option<Rgb<u8>> {
    let polar = arc.polar_angle_deg(pos);
    if polar < arc.start_angle || polar > arc.end_angle {
        return None;
    }
    let dist = arc.distance_from_center(pos);
    let half_stroke = MARKER_WIDTH / 2.0;

    let yellow_radius = arc.radius - arc.lane_width / 2.0;
    if (dist - yellow_radius).abs() <= half_stroke {
        return Some(MARKER_YELLOW);
    }

    let white_radius = arc.radius + arc.lane_width / 2.0;
    let dash_phase = normalize_degrees(polar - arc.start_angle) % (2.0 * ARC_DASH_DEG);
    if (dist - white_radius).abs() <= half_stroke && dash_phase < ARC_DASH_DEG {
        return Some(MARKER_WHITE);
    }

    if (dist - arc.radius).abs() <= arc.road_width / 2.0 {
        Some(ROAD_GRAY)
    } else {
        None
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn paint_arc(img: &mut RgbImage, arc: &ArcRoad) {
    let (width, height) = img.dimensions();
    let outer = arc.radius + arc.road_width / 2.0 + MARKER_WIDTH;
    let x0 = (arc.center.x - outer).floor().max(0.0) as u32;
    let y0 = (arc.center.y - outer).floor().max(0.0) as u32;
    let x1 = ((arc.center.x + outer).ceil().max(0.0) as u32).min(width);
    let y1 = ((arc.center.y + outer).ceil().max(0.0) as u32).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            let sample = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if let Some(color) = arc_color_at(arc, sample) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Corners of the vehicle sprite, rotated to its heading.
#[must_use]
pub fn vehicle_corners(state: &VehicleState, vehicle: &VehicleConfig) -> [DVec2; 4] {
    let forward = state.forward() * vehicle.half_height();
    let right = DVec2::new(-state.forward().y, state.forward().x) * vehicle.half_width();
    [
        state.pos + forward - right,
        state.pos + forward + right,
        state.pos - forward + right,
        state.pos - forward - right,
    ]
}

#[allow(clippy::cast_possible_truncation)]
fn paint_vehicle(img: &mut RgbImage, state: &VehicleState, vehicle: &VehicleConfig) {
    let points: Vec<Point<i32>> = vehicle_corners(state, vehicle)
        .iter()
        .map(|c| Point::new(c.x.round() as i32, c.y.round() as i32))
        .collect();
    // imageproc rejects polygons whose first and last points coincide
    if points.first() == points.last() {
        return;
    }
    draw_polygon_mut(img, &points, VEHICLE_BLUE);
}
