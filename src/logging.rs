//! Logging setup for the `claims-etl` binary.
//!
//! Logs go to the console and to daily-rotated files in the app data
//! directory. The library itself only emits `tracing` events; installing a
//! subscriber is the binary's job.
//!
//! ```no_run
//! claims_etl::logging::init().expect("Failed to initialize logging");
//! tracing::info!("--- Starting ETL Pipeline ---");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Overrides the log directory when set.
pub const LOG_DIR_ENV: &str = "CLAIMS_ETL_LOG_DIR";

const APP_DIR: &str = "claims-etl";

/// Log directory below a platform data directory.
pub fn log_dir_under(base_dir: &Path) -> PathBuf {
    base_dir.join(APP_DIR).join("logs")
}

/// Gets the log directory path, creating it if needed.
///
/// Uses `CLAIMS_ETL_LOG_DIR` when set, otherwise:
/// - Windows: `%APPDATA%/claims-etl/logs`
/// - macOS: `~/Library/Application Support/claims-etl/logs`
/// - Linux: `~/.local/share/claims-etl/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => log_dir_under(&dirs::data_dir().context("Failed to determine data directory")?),
    };

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initializes console and file logging.
///
/// Creates two daily-rotated files, keeping 10 of each:
/// - `claims-etl.<date>.log`: everything passing the env filter
/// - `error.<date>.log`: warnings and errors only
///
/// If the log directory cannot be prepared, logging continues on the
/// console alone.
///
/// # Errors
///
/// Returns error if the env filter cannot be built.
pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let file_layers = match build_file_appenders() {
        Ok((all_logs_appender, error_logs_appender)) => {
            let all_logs_layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(all_logs_appender);

            let error_logs_layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(error_logs_appender)
                .with_filter(EnvFilter::new("warn"));

            Some(all_logs_layer.and_then(error_logs_layer))
        }
        Err(e) => {
            report_without_subscriber(&format!("File logging disabled: {e:#}"));
            None
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layers)
        .init();

    Ok(())
}

// No subscriber is installed yet, stderr is the only place this can go.
#[expect(clippy::print_stderr)]
fn report_without_subscriber(msg: &str) {
    eprintln!("{msg}");
}

fn build_file_appenders() -> Result<(RollingFileAppender, RollingFileAppender)> {
    let log_dir = get_log_dir()?;

    let all_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix(APP_DIR)
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create all-logs file appender")?;

    let error_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("error")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create error-logs file appender")?;

    Ok((all_logs_appender, error_logs_appender))
}

/// Gets the path to today's log file.
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("{APP_DIR}.{today}.log")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_under() {
        let log_dir = log_dir_under(Path::new("/data"));
        assert!(log_dir.ends_with("claims-etl/logs") || log_dir.ends_with("claims-etl\\logs"));
    }
}
