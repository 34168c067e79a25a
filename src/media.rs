//! FFmpeg-backed video source.
//!
//! [`MediaFile`] opens a container, caches metadata for its best video
//! stream and decodes single frames by timestamp. The demuxer is closed when
//! the value is dropped.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    error::FramesiftError,
    metadata::VideoMetadata,
    sampling::total_frame_count,
    source::VideoSource,
    utilities::{duration_to_stream_timestamp, frame_to_rgb_buffer, pts_to_seconds, rational_to_fps},
};

/// An opened video file.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::MediaFile;
///
/// let mut media = MediaFile::open("input.mp4")?;
/// let frame = media.frame_at(Duration::from_secs(2))?;
/// frame.save("two_seconds.jpg")?;
/// # Ok::<(), framesift::FramesiftError>(())
/// ```
pub struct MediaFile {
    input_context: Input,
    video_stream_index: usize,
    metadata: VideoMetadata,
    file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a video file.
    ///
    /// Initializes FFmpeg (idempotent), opens the container and caches the
    /// metadata of its best video stream.
    ///
    /// # Errors
    ///
    /// - [`FramesiftError::FileOpen`] if the file cannot be opened or its
    ///   video codec parameters cannot be read.
    /// - [`FramesiftError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramesiftError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening media file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| FramesiftError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FramesiftError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(FramesiftError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                FramesiftError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| FramesiftError::FileOpen {
                path: file_path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let frames_per_second = rational_to_fps(stream.avg_frame_rate())
            .or_else(|| rational_to_fps(stream.rate()))
            .unwrap_or(0.0);

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count: total_frame_count(duration.as_secs_f64(), frames_per_second),
            duration,
            codec,
            format: input_context.format().name().to_string(),
        };

        log::debug!(
            "{}: {}x{} @ {:.3} fps, {:?}, ~{} frames",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.duration,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            metadata,
            file_path,
        })
    }

    /// Metadata cached when the file was opened.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Decode the frame shown at `timestamp`.
    ///
    /// Seeks to the nearest keyframe before the target and decodes forward
    /// to the first frame presented at or after it. The frame is returned in
    /// RGB8 at the source resolution.
    ///
    /// # Errors
    ///
    /// - [`FramesiftError::InvalidTimestamp`] if `timestamp` exceeds the
    ///   duration.
    /// - [`FramesiftError::VideoDecodeError`] if no frame at or after the
    ///   timestamp could be decoded.
    /// - [`FramesiftError::FfmpegError`] for seek, decode or scaling failures.
    pub fn frame_at(&mut self, timestamp: Duration) -> Result<DynamicImage, FramesiftError> {
        if timestamp > self.metadata.duration {
            return Err(FramesiftError::InvalidTimestamp(timestamp));
        }

        let width = self.metadata.width;
        let height = self.metadata.height;

        let stream = self
            .input_context
            .stream(self.video_stream_index)
            .ok_or(FramesiftError::NoVideoStream)?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        // Container-level seek expects AV_TIME_BASE (microseconds).
        let seek_target = timestamp.as_micros() as i64;
        self.input_context.seek(seek_target, ..seek_target)?;

        // Truncated to the stream's time base so a frame stamped exactly at
        // the target is not skipped over by float rounding.
        let target_seconds = pts_to_seconds(
            duration_to_stream_timestamp(timestamp, time_base),
            time_base,
        );
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.timestamp().or(decoded_frame.pts()).unwrap_or(0);
                if pts_to_seconds(pts, time_base) >= target_seconds {
                    scaler.run(&decoded_frame, &mut rgb_frame)?;
                    return convert_frame_to_image(&rgb_frame, width, height);
                }
            }
        }

        // The last frames of a stream only come out after a flush.
        decoder.send_eof()?;
        let mut last_frame = None;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.timestamp().or(decoded_frame.pts()).unwrap_or(0);
            if pts_to_seconds(pts, time_base) >= target_seconds {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return convert_frame_to_image(&rgb_frame, width, height);
            }
            scaler.run(&decoded_frame, &mut rgb_frame)?;
            last_frame = Some(convert_frame_to_image(&rgb_frame, width, height)?);
        }

        // A timestamp inside the final frame's display interval maps to that frame.
        last_frame.ok_or_else(|| {
            FramesiftError::VideoDecodeError(format!(
                "Could not locate a frame at {timestamp:?} in {}",
                self.file_path.display()
            ))
        })
    }
}

impl VideoSource for MediaFile {
    fn duration(&self) -> f64 {
        self.metadata.duration.as_secs_f64()
    }

    fn frames_per_second(&self) -> f64 {
        self.metadata.frames_per_second
    }

    fn frame_at(&mut self, timestamp: Duration) -> Result<DynamicImage, FramesiftError> {
        MediaFile::frame_at(self, timestamp)
    }
}

impl Drop for MediaFile {
    fn drop(&mut self) {
        log::debug!("Closing media file: {}", self.file_path.display());
    }
}

/// Convert a scaled RGB24 video frame to an [`image::DynamicImage`].
fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, FramesiftError> {
    let buffer = frame_to_rgb_buffer(rgb_frame, width, height);
    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        FramesiftError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}
