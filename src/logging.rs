use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Env var naming an optional log file.
pub const LOG_FILE_ENV: &str = "CCSWITCH_LOG";

/// Initialize tracing.
///
/// Warnings go to stderr by default (`RUST_LOG` overrides the filter).
/// Set `CCSWITCH_LOG` to a file path to also get an `info`-level log file.
///
/// Log files are created with unique names to prevent conflicts when
/// multiple instances run simultaneously: `{path}.{timestamp}.{pid}`
pub fn init_tracing() {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    let file_layer = log_file().map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(EnvFilter::new("info"))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

fn log_file() -> Option<std::fs::File> {
    let log_path = std::env::var(LOG_FILE_ENV).ok().filter(|p| !p.is_empty())?;

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    match std::fs::File::create(&unique_path) {
        Ok(file) => Some(file),
        Err(_) => {
            eprintln!("Warning: Failed to create log file: {}", unique_path);
            None
        }
    }
}
