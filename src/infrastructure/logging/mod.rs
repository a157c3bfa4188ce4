//! Logging infrastructure with optional rolling file output.

use crate::infrastructure::config::{paths, LoggingConfig};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging with console and optional file output.
///
/// Log files go to the `logs/` folder of the config directory:
/// - macOS: ~/Library/Application Support/settings-core/logs/
/// - Windows: %APPDATA%\settings-core\logs\
/// - Linux: ~/.config/settings-core/logs/
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup(config: &LoggingConfig) {
    let filter = build_filter(&config.level);

    // Console layer (always enabled)
    let console_layer = fmt::layer().with_target(true).with_filter(filter);

    let file_layer = if config.file_enabled {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, &log_dir, &config.file_name);

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false) // No ANSI colors in file output
                    .with_writer(file_appender)
                    .with_filter(build_filter(&config.level)),
            )
        }
    } else {
        None
    };

    let result = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match result {
        Ok(()) => {
            if config.file_enabled {
                tracing::info!("File logging enabled: {:?}", paths::log_dir());
            }
            tracing::info!("Logging initialized (level={})", config.level);
        }
        Err(_) => {
            tracing::debug!("Global subscriber already set, keeping it");
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
