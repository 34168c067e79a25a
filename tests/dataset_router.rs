//! Dataset router integration tests.

use std::{fs, path::Path};

use framesift::{FramesiftError, route_dataset};

fn write_files(directory: &Path, names: &[&str]) {
    for name in names {
        fs::write(directory.join(name), format!("contents of {name}"))
            .expect("Failed to write fixture file");
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).expect("Failed to read routed file")
}

#[test]
fn pairs_are_renamed_in_sorted_order() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(
        frames.path(),
        &["b.jpg", "b.txt", "a.jpg", "a.txt", "classes.txt"],
    );

    let report = route_dataset(frames.path(), data.path()).expect("Routing should succeed");

    assert_eq!(report.pairs.len(), 2);
    assert_eq!(report.pairs[0].source_stem, "a");
    assert_eq!(report.pairs[1].source_stem, "b");

    let images = data.path().join("images");
    let labels = data.path().join("labels");
    assert_eq!(read(images.join("frame_000000.jpg")), "contents of a.jpg");
    assert_eq!(read(labels.join("frame_000000.txt")), "contents of a.txt");
    assert_eq!(read(images.join("frame_000001.jpg")), "contents of b.jpg");
    assert_eq!(read(labels.join("frame_000001.txt")), "contents of b.txt");

    assert_eq!(fs::read_dir(&images).unwrap().count(), 2);
    assert_eq!(fs::read_dir(&labels).unwrap().count(), 2);
}

#[test]
fn prefix_stems_follow_file_name_order() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(frames.path(), &["clip.jpg", "clip.txt", "clip-2.jpg", "clip-2.txt"]);

    let report = route_dataset(frames.path(), data.path()).expect("Routing should succeed");

    let stems: Vec<_> = report.pairs.iter().map(|pair| pair.source_stem.as_str()).collect();
    assert_eq!(stems, vec!["clip-2", "clip"]);
    assert_eq!(
        read(data.path().join("images/frame_000000.jpg")),
        "contents of clip-2.jpg"
    );
    assert_eq!(
        read(data.path().join("labels/frame_000001.txt")),
        "contents of clip.txt"
    );
}

#[test]
fn unlabelled_images_are_not_routed() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(frames.path(), &["a.jpg", "a.txt", "skipped.jpg"]);

    let report = route_dataset(frames.path(), data.path()).expect("Routing should succeed");

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(fs::read_dir(data.path().join("images")).unwrap().count(), 1);
}

#[test]
fn label_without_image_fails_with_not_found() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(frames.path(), &["a.jpg", "a.txt", "b.txt"]);

    let result = route_dataset(frames.path(), data.path());

    match result {
        Err(FramesiftError::Copy { from, source, .. }) => {
            assert_eq!(from, frames.path().join("b.jpg"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected Copy error, got: {other:?}"),
    }
    // The pair before the failure stays routed.
    assert!(data.path().join("images/frame_000000.jpg").is_file());
    assert!(!data.path().join("labels/frame_000001.txt").exists());
}

#[test]
fn rerun_replaces_previous_output() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(frames.path(), &["a.jpg", "a.txt"]);

    route_dataset(frames.path(), data.path()).expect("First run should succeed");
    fs::write(frames.path().join("a.txt"), "0 0.5 0.5 0.1 0.1").unwrap();
    route_dataset(frames.path(), data.path()).expect("Second run should succeed");

    assert_eq!(
        read(data.path().join("labels/frame_000000.txt")),
        "0 0.5 0.5 0.1 0.1"
    );
}

#[test]
fn empty_frames_folder_routes_nothing() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    write_files(frames.path(), &["classes.txt"]);

    let report = route_dataset(frames.path(), data.path()).expect("Routing should succeed");

    assert!(report.pairs.is_empty());
    assert!(data.path().join("images").is_dir());
    assert!(data.path().join("labels").is_dir());
}

#[test]
fn missing_frames_folder_is_an_error() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let result = route_dataset(&root.path().join("frames"), &root.path().join("data"));
    assert!(matches!(
        result,
        Err(FramesiftError::InputDirectoryMissing(_))
    ));
}
