//! Tests for the CSV ledger

use std::fs;

use dataset::{read_ledger, LedgerRecord, LedgerWriter};

#[test]
fn header_is_written_even_without_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    let ledger = LedgerWriter::create(&path).unwrap();
    assert_eq!(ledger.rows(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "image_filename,steering_angle\n");
}

#[test]
fn rows_are_visible_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    let mut ledger = LedgerWriter::create(&path).unwrap();
    ledger
        .append(&LedgerRecord {
            image_filename: "frame_00000.png".into(),
            steering_angle: -1.5,
        })
        .unwrap();

    // Still open: the row must already be on disk.
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "image_filename,steering_angle\nframe_00000.png,-1.5\n");
    assert_eq!(ledger.rows(), 1);
}

#[test]
fn create_truncates_existing_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    fs::write(&path, "image_filename,steering_angle\nold.png,3.0\n").unwrap();

    LedgerWriter::create(&path).unwrap();
    assert!(read_ledger(&path).unwrap().is_empty(), "old rows must be gone");
}

#[test]
fn malformed_rows_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    fs::write(
        &path,
        "image_filename,steering_angle\n\
         frame_00000.png,0.25\n\
         frame_00001.png,not-a-number\n\
         frame_00002.png\n\
         frame_00003.png,-7\n",
    )
    .unwrap();

    let records = read_ledger(&path).unwrap();
    assert_eq!(
        records,
        vec![
            LedgerRecord {
                image_filename: "frame_00000.png".into(),
                steering_angle: 0.25,
            },
            LedgerRecord {
                image_filename: "frame_00003.png".into(),
                steering_angle: -7.0,
            },
        ]
    );
}

#[test]
fn missing_ledger_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_ledger(dir.path().join("nope.csv")).is_err());
}
