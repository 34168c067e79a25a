use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;

use framesift::logging;

#[derive(Debug, Parser)]
#[command(
    name = "route-dataset",
    version,
    about = "Copy annotated frame/label pairs into images/ and labels/ with sequential names",
    after_help = "Examples:\n  route-dataset\n  route-dataset --frames-dir ./frames --data-dir ./data"
)]
struct Cli {
    /// Folder holding `<name>.jpg` + `<name>.txt` pairs and an optional classes.txt.
    #[arg(long, default_value = "frames")]
    frames_dir: PathBuf,

    /// Dataset root receiving images/ and labels/.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Show every copied pair.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_console_logger(cli.verbose);

    match framesift::route_dataset(&cli.frames_dir, &cli.data_dir) {
        Ok(report) => {
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Routed {} pair(s) into {}",
                    report.pairs.len(),
                    cli.data_dir.display()
                )
                .green()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
