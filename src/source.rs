//! Collaborator seams for the frame sampler.
//!
//! The sampler only needs three capabilities: open a video, decode the frame
//! at a timestamp, and write a raster to disk. [`VideoOpener`],
//! [`VideoSource`] and [`FrameWriter`] describe them so that the sampling
//! contract can be exercised without real media. [`FfmpegOpener`] and
//! [`JpegWriter`] are the production implementations.
//!
//! A source is released by dropping it. There is no `close` method to call.

use std::{fs::File, io::BufWriter, path::Path, time::Duration};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use crate::{error::FramesiftError, media::MediaFile, sampling::total_frame_count};

/// An opened video that frames can be fetched from.
pub trait VideoSource {
    /// Duration in seconds.
    fn duration(&self) -> f64;

    /// Frame rate in frames per second.
    fn frames_per_second(&self) -> f64;

    /// Estimated frame count, `floor(duration * fps)`.
    fn frame_count(&self) -> u64 {
        total_frame_count(self.duration(), self.frames_per_second())
    }

    /// Decode the frame shown at `timestamp`.
    fn frame_at(&mut self, timestamp: Duration) -> Result<DynamicImage, FramesiftError>;
}

/// Opens video files into [`VideoSource`] values.
pub trait VideoOpener {
    /// The source type produced by this opener.
    type Source: VideoSource;

    /// Open the video at `path`.
    fn open(&self, path: &Path) -> Result<Self::Source, FramesiftError>;
}

/// Writes decoded frames to disk.
pub trait FrameWriter {
    /// Encode `image` and write it to `path`, replacing any existing file.
    fn write(&self, path: &Path, image: &DynamicImage) -> Result<(), FramesiftError>;
}

/// Opens videos with FFmpeg as [`MediaFile`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegOpener;

impl VideoOpener for FfmpegOpener {
    type Source = MediaFile;

    fn open(&self, path: &Path) -> Result<MediaFile, FramesiftError> {
        MediaFile::open(path)
    }
}

/// Writes frames as baseline JPEG files.
#[derive(Debug, Clone, Copy)]
pub struct JpegWriter {
    quality: u8,
}

impl JpegWriter {
    /// Default encoder quality.
    pub const DEFAULT_QUALITY: u8 = 95;

    /// Create a writer with the default quality.
    pub fn new() -> Self {
        Self {
            quality: Self::DEFAULT_QUALITY,
        }
    }

    /// Set the encoder quality, clamped to `1..=100`.
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// The configured encoder quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameWriter for JpegWriter {
    fn write(&self, path: &Path, image: &DynamicImage) -> Result<(), FramesiftError> {
        // JPEG has no alpha channel.
        let rgb = image.to_rgb8();
        let mut output = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(&mut output, self.quality).encode_image(&rgb)?;
        Ok(())
    }
}
