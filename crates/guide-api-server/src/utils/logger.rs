use anyhow::Result;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "guide";

/// `<dir>/guide.<date>.log`, rotated daily; `None` when file logging is off
fn file_appender(config: &LoggingConfig) -> Result<Option<RollingFileAppender>> {
    if !config.file_enabled {
        return Ok(None);
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&config.directory)?;
    Ok(Some(appender))
}

pub fn init_logger(config: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_new(&log_level)?;
    let file = file_appender(config)?;
    let file_enabled = file.is_some();

    match config.format.as_str() {
        "json" => {
            let file_layer = file.map(|writer| {
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stdout)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(file_layer)
                .try_init()?;
        }
        _ => {
            let file_layer = file.map(|writer| {
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_target(true))
                .with(file_layer)
                .try_init()?;
        }
    }

    tracing::debug!(
        "Logging initialized (format={}, file={})",
        config.format,
        if file_enabled { config.directory.as_str() } else { "off" }
    );
    Ok(())
}
