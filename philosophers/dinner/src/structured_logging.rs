//! Logging setup for the dinner binary
//!
//! Diagnostics go through `tracing`. By default they are written to stderr and
//! filtered by `RUST_LOG`, keeping stdout free for the narration. With
//! development logging enabled everything down to DEBUG lands in a log file
//! instead.

use anyhow::{Context, Result};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::constants;

/// Initialize tracing. Keep the returned guard alive until exit so buffered
/// file output gets flushed.
pub fn init_component_tracing(
    enable_dev_log: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if enable_dev_log {
        use std::fs::OpenOptions;
        use tracing_appender::non_blocking;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(constants::dev_log_path())
            .with_context(|| format!("Failed to open {}", constants::dev_log_path()))?;

        let (file_writer, guard) = non_blocking(file);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;

        eprintln!(
            "Development logging enabled - writing to {} (PID: {})",
            constants::dev_log_path(),
            std::process::id()
        );

        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(tracing_subscriber::EnvFilter::from_default_env()),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(None)
    }
}
