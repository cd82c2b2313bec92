use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Path of the debug log file, if file logging is enabled.
pub const LOG_FILE_ENV: &str = "CARELINK_LOG_FILE";
/// Filter directives in `tracing_subscriber::EnvFilter` syntax.
pub const LOG_FILTER_ENV: &str = "CARELINK_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// File-only logging for hosts that own the terminal. Without
/// `CARELINK_LOG_FILE` nothing is installed and events are dropped.
pub fn init_file_tracing(service_name: &str) {
    let Ok(log_path) = std::env::var(LOG_FILE_ENV) else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path, e);
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(filter("info"));

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    tracing::info!(service = service_name, "file logging enabled");
}

/// Stderr logging for command-line use; the file layer is added when configured.
pub fn init_stderr_tracing(service_name: &str) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter("warn"));

    let file_layer = std::env::var(LOG_FILE_ENV).ok().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(|file| {
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_filter(filter("debug"))
            })
    });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    tracing::debug!(service = service_name, "tracing initialised");
}
