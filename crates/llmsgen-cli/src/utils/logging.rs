//! Logging initialization and configuration.
//!
//! Depending on `logging.mode`, events go to stderr, to an append-only log
//! file, to both, or nowhere. File lines read `[YYYY-MM-DD HH:MM:SS] message`
//! in local time.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use chrono::Local;
use llmsgen_core::LoggingConfig;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;

/// Level selected by the verbosity flags.
pub const fn level_for(cli: &Cli) -> LevelFilter {
    if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::INFO
    }
}

/// Initialize the logging subsystem for `logging` at the CLI's level.
///
/// A log file that cannot be opened produces a warning on stderr and the run
/// continues without it.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli, logging: &LoggingConfig) -> Result<()> {
    let level = level_for(cli);

    let console = logging.mode.console().then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .with_filter(level)
    });

    let file = if logging.mode.file() {
        match open_log_file(&logging.file) {
            Ok(file) => Some(file_layer(file).with_filter(level)),
            Err(e) => {
                eprintln!(
                    "Warning: cannot open log file {}: {e}; continuing without it",
                    logging.file.display()
                );
                None
            },
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Layer writing timestamped plain lines to `file`.
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .event_format(TimestampedLine)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}

/// `[YYYY-MM-DD HH:MM:SS] message` in local time.
struct TimestampedLine;

impl<S, N> FormatEvent<S, N> for TimestampedLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
