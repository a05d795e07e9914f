//! Logging configuration using tracing
//!
//! The TUI owns the terminal, so every run (TUI or CLI) logs to a daily
//! rolling file under `<data_dir>/logs/`. Level is controlled by the
//! `LODE_LOG` environment variable, e.g. `LODE_LOG=lodestone=debug lode`.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "LODE_LOG";
const DEFAULT_FILTER: &str = "lodestone=info,warn";

pub fn log_directory(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Initialize the logging subsystem. A second call is a no-op.
pub fn init(data_dir: &Path) -> std::io::Result<()> {
    let log_dir = log_directory(data_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "lode.log");

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "lodestone starting");
        tracing::info!("log directory: {}", log_dir.display());
    }
    Ok(())
}
