//! # framesift
//!
//! Build object-detection datasets from video.
//!
//! `framesift` does two unrelated jobs:
//!
//! - **Frame sampling**: pick a random set of frames from every video in a
//!   directory and save them as JPEGs named `{video_stem}_frame_{rank:03}.jpg`,
//!   ready to be annotated.
//! - **Dataset routing**: take the annotated `<name>.jpg` / `<name>.txt`
//!   pairs and copy them into `images/frame_{i:06}.jpg` and
//!   `labels/frame_{i:06}.txt`.
//!
//! Decoding is done by FFmpeg via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) and JPEG encoding
//! by the [`image`](https://crates.io/crates/image) crate.
//!
//! ## Quick Start
//!
//! ### Sample frames
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = framesift::process_videos(Path::new("videos"), Path::new("frames"), 5)?;
//! for video in &report.videos {
//!     println!("{}: {} frame(s)", video.video_stem, video.extracted());
//! }
//! # Ok::<(), framesift::FramesiftError>(())
//! ```
//!
//! ### Reproducible sampling
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framesift::FrameSampler;
//!
//! let mut sampler = FrameSampler::ffmpeg_seeded(42);
//! let report = sampler.extract_random_frames(Path::new("clip.mp4"), Path::new("frames"), 10);
//! # let _ = report;
//! ```
//!
//! ### Route annotated frames
//!
//! ```no_run
//! use std::path::Path;
//!
//! framesift::route_dataset(Path::new("frames"), Path::new("data"))?;
//! # Ok::<(), framesift::FramesiftError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system.

pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod logging;
pub mod media;
pub mod metadata;
pub mod progress;
pub mod router;
pub mod sampler;
pub mod sampling;
pub mod source;
mod utilities;

pub use config::{DEFAULT_VIDEO_EXTENSION, SamplerOptions};
pub use error::FramesiftError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use media::MediaFile;
pub use metadata::VideoMetadata;
pub use progress::{ProgressCallback, ProgressInfo};
pub use router::{CLASSES_FILE_NAME, RouteReport, RoutedPair, route_dataset, routed_file_stem};
pub use sampler::{
    BatchReport, FrameFailure, FrameSampler, VideoOutcome, VideoReport, extract_random_frames,
    process_videos,
};
pub use sampling::{frame_file_name, frame_timestamp, sample_frame_indices, total_frame_count};
pub use source::{FfmpegOpener, FrameWriter, JpegWriter, VideoOpener, VideoSource};
