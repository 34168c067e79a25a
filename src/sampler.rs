//! Random frame sampling.
//!
//! [`FrameSampler`] draws a random, sorted set of frame indices from each
//! video and writes the decoded frames as `{stem}_frame_{rank:03}.jpg`.
//! Failures are isolated: a frame that cannot be decoded or written is
//! recorded and skipped, and a video that cannot be opened (or has no
//! frames) is recorded and the batch moves on. Nothing below the batch
//! level is returned as an error; callers inspect [`VideoReport`] values.
//!
//! # Example
//!
//! ```no_run
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! use framesift::{FfmpegOpener, FrameSampler, JpegWriter};
//!
//! let mut sampler = FrameSampler::new(FfmpegOpener, JpegWriter::new(), StdRng::seed_from_u64(7));
//! let report = sampler.process_videos("videos".as_ref(), "frames".as_ref(), 5)?;
//! println!("{} frames written", report.total_extracted());
//! # Ok::<(), framesift::FramesiftError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::SamplerOptions,
    error::FramesiftError,
    progress::ProgressTracker,
    sampling::{frame_file_name, frame_timestamp, sample_frame_indices},
    source::{FfmpegOpener, FrameWriter, JpegWriter, VideoOpener, VideoSource},
};

/// How sampling of one video ended.
#[derive(Debug)]
#[non_exhaustive]
pub enum VideoOutcome {
    /// The video could not be opened. Nothing was written.
    OpenFailed(FramesiftError),
    /// The video reported zero frames. Nothing was written.
    Empty,
    /// Every sampled index was attempted.
    Sampled,
}

/// A sampled frame that could not be decoded or written.
#[derive(Debug)]
pub struct FrameFailure {
    /// Source frame index.
    pub frame_number: u64,
    /// 1-based rank of the index within the sampled set.
    pub rank: usize,
    /// Why the frame was skipped.
    pub error: FramesiftError,
}

/// Result of sampling a single video.
#[derive(Debug)]
#[must_use]
pub struct VideoReport {
    /// Path of the video.
    pub video_path: PathBuf,
    /// File name without extension; prefix of every output file.
    pub video_stem: String,
    /// Frames the caller asked for.
    pub requested: u64,
    /// Estimated frame count of the video (0 if it never opened).
    pub total_frames: u64,
    /// Sampled source indices, ascending. Rank `r` is `sampled[r - 1]`.
    pub sampled: Vec<u64>,
    /// Files written, in rank order.
    pub written: Vec<PathBuf>,
    /// Sampled frames that were skipped.
    pub failures: Vec<FrameFailure>,
    /// Terminal state of this video.
    pub outcome: VideoOutcome,
}

impl VideoReport {
    fn new(video_path: &Path, video_stem: String, requested: u64, outcome: VideoOutcome) -> Self {
        Self {
            video_path: video_path.to_path_buf(),
            video_stem,
            requested,
            total_frames: 0,
            sampled: Vec::new(),
            written: Vec::new(),
            failures: Vec::new(),
            outcome,
        }
    }

    /// Number of frames written.
    pub fn extracted(&self) -> usize {
        self.written.len()
    }

    /// Number of frames actually attempted, `min(requested, total_frames)`.
    pub fn effective(&self) -> u64 {
        self.sampled.len() as u64
    }

    /// Whether the request was reduced to the available frame count.
    pub fn clamped(&self) -> bool {
        self.total_frames > 0 && self.requested > self.total_frames
    }
}

/// Result of a batch run, one report per video in processing order.
#[derive(Debug, Default)]
#[must_use]
pub struct BatchReport {
    /// Per-video reports.
    pub videos: Vec<VideoReport>,
}

impl BatchReport {
    /// Frames written across all videos.
    pub fn total_extracted(&self) -> usize {
        self.videos.iter().map(VideoReport::extracted).sum()
    }

    /// Videos that were opened but had no frames, or failed to open.
    pub fn skipped_videos(&self) -> impl Iterator<Item = &VideoReport> {
        self.videos
            .iter()
            .filter(|video| !matches!(video.outcome, VideoOutcome::Sampled))
    }
}

/// Samples random frames from videos.
///
/// The opener, writer and random number generator are injected, so a seeded
/// RNG makes runs reproducible.
#[derive(Debug)]
pub struct FrameSampler<O, W, R> {
    opener: O,
    writer: W,
    rng: R,
    options: SamplerOptions,
}

impl FrameSampler<FfmpegOpener, JpegWriter, StdRng> {
    /// FFmpeg decoding, JPEG output, entropy-seeded RNG.
    pub fn ffmpeg() -> Self {
        Self::new(FfmpegOpener, JpegWriter::new(), StdRng::from_entropy())
    }

    /// FFmpeg decoding, JPEG output, RNG seeded with `seed`.
    pub fn ffmpeg_seeded(seed: u64) -> Self {
        Self::new(FfmpegOpener, JpegWriter::new(), StdRng::seed_from_u64(seed))
    }
}

impl<O, W, R> FrameSampler<O, W, R>
where
    O: VideoOpener,
    W: FrameWriter,
    R: Rng,
{
    /// Create a sampler with default [`SamplerOptions`].
    pub fn new(opener: O, writer: W, rng: R) -> Self {
        Self {
            opener,
            writer,
            rng,
            options: SamplerOptions::new(),
        }
    }

    /// Replace the sampler options.
    #[must_use]
    pub fn with_options(mut self, options: SamplerOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the frame writer.
    #[must_use]
    pub fn with_writer<W2: FrameWriter>(self, writer: W2) -> FrameSampler<O, W2, R> {
        FrameSampler {
            opener: self.opener,
            writer,
            rng: self.rng,
            options: self.options,
        }
    }

    /// Current options.
    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Sample up to `requested_count` random frames from one video.
    ///
    /// Writes `{stem}_frame_{rank:03}.jpg` into `output_folder` for every
    /// frame that decodes and encodes successfully, overwriting files of the
    /// same name. The output folder must already exist.
    ///
    /// Never fails: open failures, empty videos and per-frame failures are
    /// logged and described by the returned report.
    pub fn extract_random_frames(
        &mut self,
        video_path: &Path,
        output_folder: &Path,
        requested_count: u64,
    ) -> VideoReport {
        let video_stem = video_stem(video_path);

        let mut source = match self.opener.open(video_path) {
            Ok(source) => source,
            Err(error) => {
                log::error!("Could not open video {}: {error}", video_path.display());
                self.options.progress.on_video_finished(&video_stem);
                return VideoReport::new(
                    video_path,
                    video_stem,
                    requested_count,
                    VideoOutcome::OpenFailed(error),
                );
            }
        };

        let mut report = VideoReport::new(
            video_path,
            video_stem,
            requested_count,
            VideoOutcome::Sampled,
        );
        report.total_frames = source.frame_count();

        if report.total_frames == 0 {
            log::error!("Video {} has no frames", video_path.display());
            report.outcome = VideoOutcome::Empty;
            self.options.progress.on_video_finished(&report.video_stem);
            return report;
        }

        if report.clamped() {
            log::warn!(
                "{} has only {} frames, extracting all",
                report.video_stem,
                report.total_frames
            );
        }

        report.sampled = sample_frame_indices(report.total_frames, requested_count, &mut self.rng);
        log::debug!(
            "{}: sampling {} of {} frames",
            report.video_stem,
            report.sampled.len(),
            report.total_frames
        );

        let frames_per_second = source.frames_per_second();
        let mut tracker = ProgressTracker::new(
            self.options.progress.as_ref(),
            &report.video_stem,
            report.sampled.len() as u64,
        );

        for (position, &frame_number) in report.sampled.iter().enumerate() {
            let rank = position + 1;
            let path = output_folder.join(frame_file_name(&report.video_stem, rank));
            let timestamp = frame_timestamp(frame_number, frames_per_second);

            let result = source
                .frame_at(timestamp)
                .and_then(|image| self.writer.write(&path, &image));

            match result {
                Ok(()) => {
                    log::debug!("saved frame {frame_number} -> {}", path.display());
                    tracker.advance(frame_number, true);
                    report.written.push(path);
                }
                Err(error) => {
                    log::warn!(
                        "Could not extract frame {frame_number} from {}: {error}",
                        report.video_stem
                    );
                    tracker.advance(frame_number, false);
                    report.failures.push(FrameFailure {
                        frame_number,
                        rank,
                        error,
                    });
                }
            }
        }

        drop(source);
        self.options.progress.on_video_finished(&report.video_stem);
        log::info!(
            "Extracted {} frames from {}",
            report.extracted(),
            report.video_stem
        );
        report
    }

    /// Sample `requested_count` frames from every video in `input_folder`.
    ///
    /// Videos are the regular files whose extension matches
    /// [`SamplerOptions::with_extensions`] (default `mp4`), processed one at a
    /// time in path order. `output_folder` is created if needed, but only
    /// once there is at least one video to process.
    ///
    /// # Errors
    ///
    /// - [`FramesiftError::InputDirectoryMissing`] if `input_folder` is not a
    ///   directory.
    /// - [`FramesiftError::IoError`] if the input folder cannot be listed or
    ///   the output folder cannot be created.
    ///
    /// An input folder without videos is not an error; the report is empty.
    pub fn process_videos(
        &mut self,
        input_folder: &Path,
        output_folder: &Path,
        requested_count: u64,
    ) -> Result<BatchReport, FramesiftError> {
        if !input_folder.is_dir() {
            log::error!("Input folder {} does not exist", input_folder.display());
            return Err(FramesiftError::InputDirectoryMissing(
                input_folder.to_path_buf(),
            ));
        }

        let videos = list_videos(input_folder, &self.options)?;
        if videos.is_empty() {
            log::info!(
                "No {} files found in {}",
                self.options.extension_label(),
                input_folder.display()
            );
            return Ok(BatchReport::default());
        }

        fs::create_dir_all(output_folder)?;
        log::info!(
            "Found {} {} file(s)",
            videos.len(),
            self.options.extension_label()
        );

        let videos = videos
            .iter()
            .map(|video| self.extract_random_frames(video, output_folder, requested_count))
            .collect();
        Ok(BatchReport { videos })
    }
}

/// Sample frames from every `.mp4` in `input_folder` with FFmpeg and an
/// entropy-seeded RNG.
///
/// See [`FrameSampler::process_videos`].
pub fn process_videos(
    input_folder: &Path,
    output_folder: &Path,
    requested_count: u64,
) -> Result<BatchReport, FramesiftError> {
    FrameSampler::ffmpeg().process_videos(input_folder, output_folder, requested_count)
}

/// Sample frames from a single video with FFmpeg and an entropy-seeded RNG.
///
/// See [`FrameSampler::extract_random_frames`].
pub fn extract_random_frames(
    video_path: &Path,
    output_folder: &Path,
    requested_count: u64,
) -> VideoReport {
    FrameSampler::ffmpeg().extract_random_frames(video_path, output_folder, requested_count)
}

fn video_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

fn list_videos(folder: &Path, options: &SamplerOptions) -> Result<Vec<PathBuf>, FramesiftError> {
    let mut videos = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && options.matches_extension(&path) {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}
