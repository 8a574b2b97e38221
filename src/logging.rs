//! Sets up the tracing subscriber.
//!
//! Warnings and errors go to stderr so they do not mix with the report on
//! stdout. Everything this crate logs at debug level and above is also
//! appended to a log file.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Install the global subscriber, appending debug logs to `log_path`.
///
/// # Errors
/// Returns [crate::Error::Logging] if the log file cannot be opened or a
/// global subscriber is already installed.
pub fn setup_logging(log_path: &Path) -> Result<(), crate::Error> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| {
            crate::Error::Logging(format!("could not open log file {log_path:?}: {error}"))
        })?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(Targets::new().with_target(env!("CARGO_CRATE_NAME"), LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init()
        .map_err(|error| crate::Error::Logging(error.to_string()))
}
