use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

use framesift::{
    BatchReport, FfmpegLogLevel, FfmpegOpener, FrameSampler, FramesiftError, JpegWriter,
    ProgressCallback, ProgressInfo, SamplerOptions, VideoOutcome,
    logging::{ConsoleLogger, ConsoleStream},
};

const CLI_AFTER_HELP: &str = "Examples:\n  extract-frames --input ./videos --output ./frames --frames 5\n  extract-frames -i ./input -o ./output -f 10 --seed 42 --progress";

#[derive(Debug, Parser)]
#[command(
    name = "extract-frames",
    version,
    about = "Extract random frames from MP4 videos",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path to input folder containing MP4 files.
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output folder where frames will be saved.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of random frames to extract from each video.
    #[arg(short, long, allow_negative_numbers = true)]
    frames: i64,

    /// Seed for reproducible frame selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Video file extension to process (repeatable, default mp4).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = JpegWriter::DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Show a progress bar per video.
    #[arg(long)]
    progress: bool,

    /// Show debug output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    log_level: String,

    /// Print a machine-readable summary after processing.
    #[arg(long)]
    json: bool,
}

fn validate_frame_count(frames: i64) -> Result<u64, &'static str> {
    u64::try_from(frames)
        .ok()
        .filter(|&count| count > 0)
        .ok_or("Number of frames must be greater than 0")
}

fn outcome_label(outcome: &VideoOutcome) -> &'static str {
    match outcome {
        VideoOutcome::OpenFailed(_) => "open_failed",
        VideoOutcome::Empty => "empty",
        VideoOutcome::Sampled => "sampled",
        _ => "unknown",
    }
}

/// Drives an indicatif bar, restarting it for every video.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("##-"));
        Self { bar }
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.current == 1 {
            self.bar.reset();
            self.bar.set_length(info.total);
            self.bar.set_message(info.video_stem.clone());
        }
        self.bar.set_position(info.current);
    }

    fn on_video_finished(&self, _video_stem: &str) {
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_message("");
    }
}

fn summary_json(report: &BatchReport) -> serde_json::Value {
    json!({
        "total_extracted": report.total_extracted(),
        "videos": report.videos.iter().map(|video| json!({
            "path": video.video_path.display().to_string(),
            "stem": video.video_stem,
            "outcome": outcome_label(&video.outcome),
            "requested": video.requested,
            "total_frames": video.total_frames,
            "sampled": video.sampled,
            "extracted": video.extracted(),
            "failed_frames": video.failures.iter().map(|failure| failure.frame_number).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}

fn run(
    cli: &Cli,
    progress: Option<Arc<BarProgress>>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let frames = match validate_frame_count(cli.frames) {
        Ok(frames) => frames,
        Err(message) => {
            log::error!("{message}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let ffmpeg_level: FfmpegLogLevel = cli
        .log_level
        .parse()
        .map_err(|error: String| format!("unsupported --log-level: {error}"))?;
    framesift::set_ffmpeg_log_level(ffmpeg_level);

    let mut options = SamplerOptions::new();
    if !cli.extensions.is_empty() {
        options = options.with_extensions(&cli.extensions);
    }
    if let Some(progress) = &progress {
        options = options.with_progress(progress.clone());
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let writer = JpegWriter::new().with_quality(cli.quality);
    let mut sampler = FrameSampler::new(FfmpegOpener, writer, rng).with_options(options);

    let result = sampler.process_videos(&cli.input, &cli.output, frames);
    if let Some(progress) = progress {
        progress.bar.finish_and_clear();
    }

    let report = match result {
        Ok(report) => report,
        // Already reported by the sampler.
        Err(FramesiftError::InputDirectoryMissing(_)) => return Ok(ExitCode::FAILURE),
        Err(error) => return Err(error.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&report))?);
    } else if !report.videos.is_empty() {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} frame(s) from {} video(s) to {}",
                report.total_extracted(),
                report.videos.len(),
                cli.output.display()
            )
            .green()
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let progress = cli.progress.then(|| Arc::new(BarProgress::new()));

    let mut logger = ConsoleLogger::new()
        .with_verbose(cli.verbose)
        .with_stream(ConsoleStream::for_output(cli.json));
    if let Some(progress) = &progress {
        logger = logger.with_progress_bar(progress.bar.clone());
    }
    logger.init();

    match run(&cli, progress) {
        Ok(code) => code,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
