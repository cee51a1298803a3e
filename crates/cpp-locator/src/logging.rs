//! Optional tracing setup for embedding hosts.
//!
//! The library itself only emits `tracing` events; hosts that want
//! them on stderr and in a log file without wiring their own
//! subscriber can call [`init_file_logging`] once at startup.

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

fn default_log_path() -> PathBuf {
    let dir = dirs_or_tmp();
    dir.join("cpp-locator.log")
}

fn dirs_or_tmp() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".cpp-locator");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

/// Install a global subscriber writing to stderr and a log file.
///
/// Returns the guard keeping the file appender alive; drop it at
/// shutdown. Calling this twice panics, as with any global subscriber
/// installation.
pub fn init_file_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> tracing_appender::non_blocking::WorkerGuard {
    let filter_spec = format!("cpp_locator={}", level.as_filter_str());

    let log_path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("cpp-locator.log")),
    );
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&filter_spec));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&filter_spec));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();

    info!("cpp-locator v{} logging to {}", env!("CARGO_PKG_VERSION"), log_path.display());
    guard
}
