//! Logging Infrastructure
//!
//! Console output (plain or JSON) plus an optional daily rolling log file.

use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON output and file output
///
/// `log_level` accepts any `EnvFilter` directive, e.g. `info` or
/// `menu_server=debug,tower_http=info`. Calling this twice is a no-op.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer()
            .json()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    } else {
        fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    };

    // Add file output if log_dir is provided
    let file = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(log_path) {
            eprintln!("Cannot create log directory {}: {}", dir, e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(log_path, "menu-server");
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_appender)
                .boxed(),
        )
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(filter)
        .try_init();
}
