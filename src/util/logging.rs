// YearScope - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - Host flag: `debug_flag = true`
//   - Config file: [logging] level = "debug"
//
// Output: stderr by default, or the file named by [logging] file.
// The library itself only emits `tracing` events; installing a subscriber
// is left to the embedding host, which calls `init` once at startup.

use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the level filter.
///
/// Priority: RUST_LOG env var > debug flag > config level > default "info".
fn build_filter(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    }
}

/// Initialise the logging subsystem.
///
/// Returns `false` when a global subscriber was already installed (a second
/// call from the same process is a no-op rather than a panic). If the log
/// file cannot be opened, logging falls back to stderr and a warning is
/// emitted through the fallback subscriber.
pub fn init(debug_flag: bool, config_level: Option<&str>, log_file: Option<&str>) -> bool {
    let filter = build_filter(debug_flag, config_level);

    let mut file_error = None;
    let installed = match log_file.map(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
    }) {
        Some(Ok(file)) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .try_init()
            .is_ok(),
        other => {
            if let Some(Err(e)) = other {
                file_error = Some(e);
            }
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .compact()
                .try_init()
                .is_ok()
        }
    };

    if let Some(e) = file_error {
        tracing::warn!(
            file = log_file.unwrap_or_default(),
            error = %e,
            "Could not open log file; logging to stderr"
        );
    }

    if installed {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }

    installed
}
