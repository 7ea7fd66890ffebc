//! Tests for viewport placement and frame normalization

use image::{Rgb, RgbImage};
use physics::{SceneSize, VehicleState};
use render::{CameraConfig, CameraError, CameraExtractor, PixelSource, Viewport};

/// Scene whose red channel encodes the column and green the row.
struct Coordinates {
    width: u32,
    height: u32,
}

impl PixelSource for Coordinates {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        [(x % 256) as u8, (y % 256) as u8, 0]
    }
}

fn scene() -> SceneSize {
    SceneSize::default()
}

#[test]
fn viewport_anchors_on_vehicle() {
    let car = VehicleState::new(400.0, 450.0, 90.0, 3.0);
    let view = Viewport::anchored(&car, -70.0, 200, 150, scene());
    assert_eq!(view, Viewport { x: 300, y: 380, width: 200, height: 150 });
}

#[test]
fn viewport_clamps_at_every_edge() {
    let top_left = VehicleState::new(-40.0, -80.0, 90.0, 3.0);
    let view = Viewport::anchored(&top_left, -70.0, 200, 150, scene());
    assert_eq!((view.x, view.y), (0, 0));

    let bottom_right = VehicleState::new(900.0, 700.0, 90.0, 3.0);
    let view = Viewport::anchored(&bottom_right, -70.0, 200, 150, scene());
    assert_eq!((view.x, view.y), (600, 450));
}

#[test]
fn viewport_always_inside_scene() {
    let scene = scene();
    let mut rng = fastrand::Rng::with_seed(11);
    for _ in 0..5_000 {
        let x = rng.f64() * 1200.0 - 200.0;
        let y = rng.f64() * 1000.0 - 200.0;
        let offset = -80.0 + rng.f64() * 20.0;
        let car = VehicleState::new(x, y, 90.0, 3.0);
        let view = Viewport::anchored(&car, offset, 200, 150, scene);
        assert!(view.fits(scene), "viewport {view:?} escapes scene for car at ({x}, {y})");
    }
}

#[test]
fn viewport_survives_non_finite_positions() {
    let car = VehicleState::new(f64::NAN, f64::INFINITY, 90.0, 3.0);
    let view = Viewport::anchored(&car, -70.0, 200, 150, scene());
    assert!(view.fits(scene()));
    assert_eq!((view.x, view.y), (0, 450));
}

#[test]
fn frame_is_row_major_height_by_width() {
    let extractor = CameraExtractor::new(CameraConfig::default(), scene()).unwrap();
    let source = Coordinates { width: 800, height: 600 };
    let car = VehicleState::new(400.0, 450.0, 90.0, 3.0);
    let frame = extractor.extract(&source, &car, -70.0).unwrap();

    assert_eq!(frame.shape(), (150, 200));
    assert_eq!(frame.as_slice().len(), 150 * 200);

    // window origin is (300, 380); row 2, col 5 samples scene pixel (305, 382)
    let expected = (0.2989 * f64::from(305_u32 % 256) + 0.5870 * f64::from(382_u32 % 256)) / 255.0;
    assert!((f64::from(frame.get(2, 5)) - expected).abs() < 1e-6);
}

#[test]
fn uniform_gray_normalizes_by_luminosity() {
    let extractor = CameraExtractor::new(CameraConfig::default(), scene()).unwrap();
    let gray = RgbImage::from_pixel(800, 600, Rgb([100, 100, 100]));
    let car = VehicleState::new(400.0, 300.0, 90.0, 3.0);
    let frame = extractor.extract(&gray, &car, -70.0).unwrap();

    let expected = (0.2989 + 0.5870 + 0.1140) * 100.0 / 255.0;
    assert!(frame
        .as_slice()
        .iter()
        .all(|v| (f64::from(*v) - expected).abs() < 1e-6));
    assert!(frame.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn luma8_truncates_like_a_byte_cast() {
    let extractor = CameraExtractor::new(CameraConfig::default(), scene()).unwrap();
    let white = RgbImage::from_pixel(800, 600, Rgb([255, 255, 255]));
    let car = VehicleState::new(400.0, 300.0, 90.0, 3.0);
    let image = extractor.extract(&white, &car, -70.0).unwrap().to_luma8();
    assert_eq!(image.dimensions(), (200, 150));
    // 0.9999 * 255 = 254.97
    assert_eq!(image.get_pixel(0, 0).0, [254]);
}

#[test]
fn camera_larger_than_scene_is_rejected() {
    let config = CameraConfig {
        width: 900,
        ..CameraConfig::default()
    };
    let err = CameraExtractor::new(config, scene()).unwrap_err();
    assert!(matches!(err, CameraError::CameraLargerThanScene { .. }));
}

#[test]
fn mismatched_scene_is_rejected() {
    let extractor = CameraExtractor::new(CameraConfig::default(), scene()).unwrap();
    let small = RgbImage::new(400, 300);
    let car = VehicleState::new(200.0, 150.0, 90.0, 3.0);
    let err = extractor.extract(&small, &car, -70.0).unwrap_err();
    assert!(matches!(err, CameraError::SceneSizeMismatch { .. }));
}

#[test]
#[should_panic(expected = "outside 200x150 frame")]
fn frame_access_past_last_column_panics() {
    let extractor = CameraExtractor::new(CameraConfig::default(), scene()).unwrap();
    let source = Coordinates { width: 800, height: 600 };
    let car = VehicleState::new(400.0, 450.0, 90.0, 3.0);
    let frame = extractor.extract(&source, &car, -70.0).unwrap();
    // Would land on row 1 of the flat buffer without the bounds check.
    let _ = frame.get(0, 200);
}
