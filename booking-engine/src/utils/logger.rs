//! Logging Infrastructure
//!
//! Structured logging setup. `RUST_LOG` overrides the level passed by the
//! embedder; file output rotates daily when a log directory is given.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (stdout, `info`).
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with an optional level, JSON output and log directory.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json = json.unwrap_or(false);

    // Write to a daily-rotated file when the directory exists
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "booking-engine");
            if json {
                tracing_subscriber::fmt()
                    .with_env_filter(filter())
                    .json()
                    .with_writer(file_appender)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_env_filter(filter())
                    .with_target(false)
                    .with_writer(file_appender)
                    .init();
            }
            return;
        }
    }

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .init();
    }
}
