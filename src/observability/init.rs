//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "conda-browse.log";

/// Initializes the tracing subscriber with a rotating log file.
///
/// Sets up a subscriber pipeline that:
/// 1. Filters events by `config.trace_level` (default `"info"`)
/// 2. Formats them as plain lines without ANSI colors
/// 3. Writes them to `<data dir>/conda-browse.log`, rotated at 10 MiB with 3 backups
///
/// The environment is not consulted. Logging is optional: if the data directory
/// cannot be created, nothing is installed. Only the first call takes effect.
///
/// Returns the log file path when a subscriber was installed.
///
/// # Example
///
/// ```no_run
/// use conda_browse::observability::init_tracing;
/// use conda_browse::Config;
///
/// let config = Config {
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<std::path::PathBuf> {
    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let log_file = data_dir.join(LOG_FILE_NAME);
    let writer = Arc::new(FileWriter::new(log_file.clone()));
    let filter = EnvFilter::try_new(&config.trace_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()
        .map(|()| log_file)
}
