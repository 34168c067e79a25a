//! Console logging for the command-line tools.
//!
//! The library only emits records through the [`log`] facade. The binaries
//! install a [`ConsoleLogger`] so those records become plain lines: info
//! records print as-is, errors and warnings get a coloured `error:` /
//! `warning:` prefix. `RUST_LOG` overrides the default filter.
//!
//! Records go to stdout unless stdout carries a machine-readable document,
//! in which case they move to stderr. While a progress bar is on screen,
//! every record is written with the bar suspended so lines never tear it.

use std::io::{self, Write};

use colored::Colorize;
use env_logger::{Builder, Env, Target};
use indicatif::ProgressBar;
use log::Level;

/// Prefix printed before a record of `level`, or `None` for plain lines.
pub fn level_label(level: Level) -> Option<&'static str> {
    match level {
        Level::Error => Some("error:"),
        Level::Warn => Some("warning:"),
        Level::Info => None,
        Level::Debug => Some("debug:"),
        Level::Trace => Some("trace:"),
    }
}

/// Stream that receives log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleStream {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

impl ConsoleStream {
    /// Stderr when stdout is reserved for a JSON summary, stdout otherwise.
    pub fn for_output(json: bool) -> Self {
        if json { Self::Stderr } else { Self::Stdout }
    }

    fn write_all(self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().write_all(bytes),
            Self::Stderr => io::stderr().lock().write_all(bytes),
        }
    }

    fn flush(self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
        }
    }
}

/// Writes each record with a progress bar hidden.
struct SuspendingWriter {
    bar: ProgressBar,
    stream: ConsoleStream,
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stream = self.stream;
        self.bar.suspend(|| stream.write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Builder for the `env_logger` backend used by the binaries.
///
/// # Example
///
/// ```no_run
/// use framesift::logging::{ConsoleLogger, ConsoleStream};
///
/// ConsoleLogger::new()
///     .with_verbose(true)
///     .with_stream(ConsoleStream::for_output(false))
///     .init();
/// ```
#[derive(Default)]
pub struct ConsoleLogger {
    verbose: bool,
    stream: ConsoleStream,
    progress_bar: Option<ProgressBar>,
}

impl ConsoleLogger {
    /// Info level, stdout, no progress bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower the default filter to `debug`.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Choose the stream that receives log lines.
    #[must_use]
    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    /// Suspend `bar` around every record.
    #[must_use]
    pub fn with_progress_bar(mut self, bar: ProgressBar) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// Selected stream.
    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    /// The `env_logger` target for the current settings.
    pub fn target(&self) -> Target {
        match (&self.progress_bar, self.stream) {
            (Some(bar), stream) => Target::Pipe(Box::new(SuspendingWriter {
                bar: bar.clone(),
                stream,
            })),
            (None, ConsoleStream::Stdout) => Target::Stdout,
            (None, ConsoleStream::Stderr) => Target::Stderr,
        }
    }

    /// Install the logger. Calling this more than once keeps the first one.
    pub fn init(self) {
        let default_filter = if self.verbose { "debug" } else { "info" };
        let result = Builder::from_env(Env::default().default_filter_or(default_filter))
            .target(self.target())
            .format(|buf, record| {
                let level = record.level();
                match level_label(level) {
                    None => writeln!(buf, "{}", record.args()),
                    Some(label) => {
                        let label = match level {
                            Level::Error => label.red().bold(),
                            Level::Warn => label.yellow().bold(),
                            _ => label.dimmed(),
                        };
                        writeln!(buf, "{label} {}", record.args())
                    }
                }
            })
            .try_init();

        if result.is_err() {
            log::debug!("console logger already installed");
        }
    }
}

/// Route `log` records to stdout.
///
/// The default filter is `info`, or `debug` when `verbose` is set.
pub fn init_console_logger(verbose: bool) {
    ConsoleLogger::new().with_verbose(verbose).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lines_are_unprefixed() {
        assert_eq!(level_label(Level::Info), None);
        assert_eq!(level_label(Level::Error), Some("error:"));
        assert_eq!(level_label(Level::Warn), Some("warning:"));
    }

    #[test]
    fn json_output_moves_logs_to_stderr() {
        assert_eq!(ConsoleStream::for_output(true), ConsoleStream::Stderr);
        assert_eq!(ConsoleStream::for_output(false), ConsoleStream::Stdout);

        let logger = ConsoleLogger::new().with_stream(ConsoleStream::for_output(true));
        assert!(matches!(logger.target(), Target::Stderr));
        assert!(matches!(ConsoleLogger::new().target(), Target::Stdout));
    }

    #[test]
    fn progress_bar_wraps_the_target() {
        let logger = ConsoleLogger::new()
            .with_stream(ConsoleStream::Stderr)
            .with_progress_bar(ProgressBar::hidden());
        assert_eq!(logger.stream(), ConsoleStream::Stderr);
        assert!(matches!(logger.target(), Target::Pipe(_)));
    }

    #[test]
    fn suspending_writer_reports_full_length() {
        let mut writer = SuspendingWriter {
            bar: ProgressBar::hidden(),
            stream: ConsoleStream::Stderr,
        };
        assert_eq!(writer.write(b"").unwrap(), 0);
        writer.flush().unwrap();
    }

    #[test]
    fn second_init_is_harmless() {
        init_console_logger(false);
        init_console_logger(true);
    }
}
