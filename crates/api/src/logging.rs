//! Operator log files.
//!
//! When `LOG_DIR` is configured the binary writes, next to stdout, two plain
//! text files: `error.log` with `ERROR` events only (every diagnostic report
//! lands here) and `combined.log` with everything from `INFO` up.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

pub const ERROR_LOG: &str = "error.log";
pub const COMBINED_LOG: &str = "combined.log";

/// Keeps the background writers alive. Pending lines are flushed on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LogFileGuard {
    _error: WorkerGuard,
    _combined: WorkerGuard,
}

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Build the file layers for `dir`, creating the directory if needed.
pub fn file_layers<S>(dir: &Path) -> Result<(BoxedLayer<S>, LogFileGuard), InitError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let (error_writer, error_guard) = tracing_appender::non_blocking(open(dir, ERROR_LOG)?);
    let (combined_writer, combined_guard) =
        tracing_appender::non_blocking(open(dir, COMBINED_LOG)?);

    let error = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(error_writer)
        .with_filter(LevelFilter::ERROR);
    let combined = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(combined_writer)
        .with_filter(LevelFilter::INFO);

    Ok((
        error.and_then(combined).boxed(),
        LogFileGuard {
            _error: error_guard,
            _combined: combined_guard,
        },
    ))
}

fn open(dir: &Path, file_name: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
}
