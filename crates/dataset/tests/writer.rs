//! Tests for the dataset sink

use std::sync::atomic::AtomicBool;

use autopilot::{Generator, GeneratorConfig, Recorder, RunOptions, Sample};
use dataset::{frame_filename, read_ledger, DatasetWriter};
use physics::{ArcRoad, DVec2, RoadGeometry, SceneSize, VehicleState};
use render::{CameraConfig, CameraExtractor};

fn sample(label: f64) -> Sample {
    let mut scene = image::RgbImage::new(800, 600);
    for pixel in scene.pixels_mut() {
        *pixel = image::Rgb([100, 100, 100]);
    }
    let camera = CameraExtractor::new(CameraConfig::default(), SceneSize::default()).unwrap();
    let car = VehicleState::new(400.0, 300.0, 90.0, 3.0);
    Sample {
        frame: camera.extract(&scene, &car, -70.0).unwrap(),
        label,
    }
}

#[test]
fn filenames_are_zero_padded() {
    assert_eq!(frame_filename(0), "frame_00000.png");
    assert_eq!(frame_filename(42), "frame_00042.png");
    assert_eq!(frame_filename(123_456), "frame_123456.png");
}

#[test]
fn record_writes_grayscale_png_and_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = DatasetWriter::create(dir.path()).unwrap();
    writer.record(7, &sample(2.5)).unwrap();

    let image_path = dir.path().join("images").join("frame_00007.png");
    let img = image::open(&image_path).unwrap();
    let gray = img.as_luma8().expect("single channel image");
    assert_eq!(gray.dimensions(), (200, 150));
    assert_eq!(gray.get_pixel(10, 10).0, [99], "0.392 * 255 truncates to 99");

    let rows = read_ledger(writer.ledger_path()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].image_filename, "frame_00007.png");
    assert!((rows[0].steering_angle - 2.5).abs() < 1e-12);
    assert_eq!(writer.samples_written(), 1);
}

#[test]
fn generator_run_fills_ledger_and_images() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = DatasetWriter::create(dir.path()).unwrap();
    let road = RoadGeometry::Arc(ArcRoad::new(DVec2::new(400.0, 300.0), 200.0, 90.0, 180.0));
    let mut generator = Generator::rasterized(GeneratorConfig::default(), road, Some(5)).unwrap();

    let options = RunOptions {
        target_samples: 12,
        pace_fps: None,
    };
    let summary = generator
        .run(&mut writer, &options, &AtomicBool::new(false))
        .unwrap();
    assert_eq!(summary.samples, 12);

    let rows = read_ledger(dir.path().join("labels.csv")).unwrap();
    assert_eq!(rows.len(), 12, "ledger must hold exactly one row per sample");
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.image_filename, frame_filename(index as u64));
        assert!(dir.path().join("images").join(&row.image_filename).is_file());
    }
}
