//! Progress reporting for frame sampling.
//!
//! A [`ProgressCallback`] attached through
//! [`SamplerOptions::with_progress`](crate::SamplerOptions::with_progress) is
//! told about every attempted frame, whether it was written or not.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesift::{ProgressCallback, ProgressInfo, SamplerOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}: {}/{}", info.video_stem, info.current, info.total);
//!     }
//! }
//!
//! let options = SamplerOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::time::{Duration, Instant};

/// A snapshot of sampling progress within one video.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Stem of the video being sampled.
    pub video_stem: String,
    /// Frames attempted so far in this video.
    pub current: u64,
    /// Frames that will be attempted in this video.
    pub total: u64,
    /// Source frame index that was just attempted.
    pub frame_number: u64,
    /// Whether that frame was written.
    pub written: bool,
    /// Wall-clock time since sampling of this video started.
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Completion percentage (0.0 – 100.0).
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.current as f64 / self.total as f64 * 100.0) as f32
    }
}

/// Trait for receiving progress updates during sampling.
///
/// Callbacks observe the run but cannot halt it.
pub trait ProgressCallback: Send + Sync {
    /// Called once per attempted frame.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called when a video is done, including videos that failed to open or
    /// had no frames.
    fn on_video_finished(&self, _video_stem: &str) {}
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing for one video and emits callbacks.
pub(crate) struct ProgressTracker<'a> {
    callback: &'a dyn ProgressCallback,
    video_stem: &'a str,
    total: u64,
    current: u64,
    start_time: Instant,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(callback: &'a dyn ProgressCallback, video_stem: &'a str, total: u64) -> Self {
        Self {
            callback,
            video_stem,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one attempted frame and notify the callback.
    pub(crate) fn advance(&mut self, frame_number: u64, written: bool) {
        self.current += 1;
        self.callback.on_progress(&ProgressInfo {
            video_stem: self.video_stem.to_string(),
            current: self.current,
            total: self.total,
            frame_number,
            written,
            elapsed: self.start_time.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recorder(Mutex<Vec<ProgressInfo>>);

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.0.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn tracker_counts_every_attempt() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        let mut tracker = ProgressTracker::new(&recorder, "clip", 3);
        tracker.advance(4, true);
        tracker.advance(9, false);
        tracker.advance(11, true);

        let infos = recorder.0.lock().unwrap();
        let currents: Vec<u64> = infos.iter().map(|info| info.current).collect();
        assert_eq!(currents, vec![1, 2, 3]);
        assert!(!infos[1].written);
        assert_eq!(infos[2].frame_number, 11);
        assert!((infos[2].percentage() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_total_reports_complete() {
        let info = ProgressInfo {
            video_stem: "clip".to_string(),
            current: 0,
            total: 0,
            frame_number: 0,
            written: false,
            elapsed: Duration::ZERO,
        };
        assert!((info.percentage() - 100.0).abs() < f32::EPSILON);
    }
}
