//! FFmpeg-backed integration tests.
//!
//! Tests that decode real video require `tests/fixtures/sample_video.mp4`
//! and return early when it is absent.

use std::{fs, path::Path, time::Duration};

use framesift::{FrameSampler, FramesiftError, MediaFile, VideoOutcome, VideoSource};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn open_nonexistent_file() {
    let result = MediaFile::open("this_file_does_not_exist.mp4");
    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    assert!(MediaFile::open(&invalid_file_path).is_err());
}

#[test]
fn invalid_video_is_skipped_by_the_batch() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(input.path().join("invalid.mp4"), b"garbage").expect("Failed to write file");

    let report = FrameSampler::ffmpeg_seeded(1)
        .process_videos(input.path(), output.path(), 3)
        .expect("Batch should run");

    assert_eq!(report.videos.len(), 1);
    assert!(matches!(
        report.videos[0].outcome,
        VideoOutcome::OpenFailed(FramesiftError::FileOpen { .. })
    ));
    assert_eq!(report.total_extracted(), 0);
}

#[test]
fn metadata_is_consistent() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let media = MediaFile::open(path).expect("Failed to open test video");
    let metadata = media.metadata();
    assert!(metadata.width > 0 && metadata.height > 0);
    assert!(metadata.frames_per_second > 0.0);
    assert_eq!(media.frame_count(), metadata.frame_count);
}

#[test]
fn frame_at_returns_source_resolution() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = MediaFile::open(path).expect("Failed to open test video");
    let (width, height) = (media.metadata().width, media.metadata().height);
    let image = media
        .frame_at(Duration::from_secs(1))
        .expect("Failed to decode frame");
    assert_eq!((image.width(), image.height()), (width, height));
}

#[test]
fn frame_at_rejects_timestamp_past_end() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = MediaFile::open(path).expect("Failed to open test video");
    let result = media.frame_at(Duration::from_secs(3600));
    assert!(matches!(result, Err(FramesiftError::InvalidTimestamp(_))));
}

#[test]
fn sampling_real_video_writes_ranked_jpegs() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let report =
        FrameSampler::ffmpeg_seeded(3).extract_random_frames(Path::new(path), output.path(), 4);

    assert!(matches!(report.outcome, VideoOutcome::Sampled));
    assert_eq!(report.extracted() + report.failures.len(), 4);
    for written in &report.written {
        let image = image::open(written).expect("Written frame should decode");
        assert!(image.width() > 0);
    }
    if report.failures.is_empty() {
        assert!(output.path().join("sample_video_frame_001.jpg").is_file());
    }
}
