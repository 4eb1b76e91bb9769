//! Logging setup.

use std::path::Path;
use tracing::Subscriber;
use tracing_appender::rolling;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Base name of the daily log files written under the log directory.
pub const LOG_FILE_NAME: &str = "screener.log";

/// Setup logging with the given level.
///
/// `RUST_LOG` takes precedence over `level`. With `log_dir` set, events are
/// also appended to a daily-rolling file in that directory.
pub fn setup_logging(level: &str, json: bool, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .with(file_layer(log_dir))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .with(file_layer(log_dir))
            .init();
    }
}

fn file_layer<S>(log_dir: Option<&Path>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    log_dir.map(|dir| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(rolling::daily(dir, LOG_FILE_NAME))
    })
}
