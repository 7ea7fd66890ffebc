//! Tests for merging generation runs

use std::fs;
use std::path::Path;

use dataset::{combined_filename, consolidate, find_runs, read_ledger};

fn write_run(root: &Path, name: &str, rows: &[(&str, f64)], images: &[&str]) {
    let run = root.join(name);
    fs::create_dir_all(run.join("images")).unwrap();
    let mut ledger = String::from("image_filename,steering_angle\n");
    for (file, label) in rows {
        ledger.push_str(&format!("{file},{label}\n"));
    }
    fs::write(run.join("labels.csv"), ledger).unwrap();
    for file in images {
        fs::write(run.join("images").join(file), file.as_bytes()).unwrap();
    }
}

#[test]
fn combined_filenames_use_six_digits() {
    assert_eq!(combined_filename(0), "image_000000.png");
    assert_eq!(combined_filename(1234), "image_001234.png");
}

#[test]
fn runs_are_found_in_name_order() {
    let root = tempfile::tempdir().unwrap();
    for name in ["run_v10", "run_v02", "notes", "run_v05"] {
        fs::create_dir_all(root.path().join(name)).unwrap();
    }
    fs::write(root.path().join("run_file.txt"), "not a dir").unwrap();

    let names: Vec<String> = find_runs(root.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["run_v02", "run_v05", "run_v10"]);
}

#[test]
fn runs_are_renumbered_into_one_sequence() {
    let root = tempfile::tempdir().unwrap();
    write_run(
        root.path(),
        "run_v02",
        &[("frame_00000.png", 1.0), ("frame_00001.png", -2.0)],
        &["frame_00000.png", "frame_00001.png"],
    );
    write_run(
        root.path(),
        "run_v01",
        &[("frame_00000.png", 0.5)],
        &["frame_00000.png"],
    );
    let out = root.path().join("combined");

    let summary = consolidate(root.path(), &out).unwrap();
    assert_eq!(summary.runs, 2);
    assert_eq!(summary.copied, 3);
    assert_eq!(summary.missing_images, 0);

    let rows = read_ledger(out.join("combined_labels.csv")).unwrap();
    let labels: Vec<f64> = rows.iter().map(|r| r.steering_angle).collect();
    assert_eq!(labels, vec![0.5, 1.0, -2.0], "run_v01 comes first");
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.image_filename, combined_filename(index as u64));
    }

    // Pairing survives: image_000002 is run_v02's second frame.
    let copied = fs::read(out.join("all_images").join("image_000002.png")).unwrap();
    assert_eq!(copied, b"frame_00001.png");
}

#[test]
fn missing_images_and_ledgers_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    write_run(
        root.path(),
        "run_a",
        &[("frame_00000.png", 1.0), ("frame_00001.png", 2.0), ("frame_00002.png", 3.0)],
        &["frame_00000.png", "frame_00002.png"],
    );
    fs::create_dir_all(root.path().join("run_b").join("images")).unwrap();
    let out = root.path().join("merged");

    let summary = consolidate(root.path(), &out).unwrap();
    assert_eq!(summary.runs, 1);
    assert_eq!(summary.skipped_runs, 1);
    assert_eq!(summary.copied, 2);
    assert_eq!(summary.missing_images, 1);

    let rows = read_ledger(out.join("combined_labels.csv")).unwrap();
    let labels: Vec<f64> = rows.iter().map(|r| r.steering_angle).collect();
    assert_eq!(labels, vec![1.0, 3.0]);
    assert_eq!(
        fs::read(out.join("all_images").join("image_000001.png")).unwrap(),
        b"frame_00002.png"
    );
}

#[test]
fn empty_root_gives_header_only_ledger() {
    let root = tempfile::tempdir().unwrap();
    let summary = consolidate(root.path(), root.path()).unwrap();
    assert_eq!(summary.copied, 0);
    let contents = fs::read_to_string(root.path().join("combined_labels.csv")).unwrap();
    assert_eq!(contents, "image_filename,steering_angle\n");
}
