//! Logging system initialization
//!
//! Writes tracing output to %APPDATA%\EasyPatch\app.log. The previous
//! sessions' logs are shifted to `app.log.1` … `app.log.5` on startup.

use crate::error::{EasyPatchError, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Number of previous sessions' logs kept next to the current one
const KEPT_SESSIONS: u8 = 5;

/// Directory that holds the log files
pub fn log_dir() -> PathBuf {
    let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(appdata).join("EasyPatch")
}

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;

    shift_session_logs(&log_dir.join("app.log"))?;

    // Rotation is handled per session above, not by the appender
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| EasyPatchError::LoggingError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| EasyPatchError::LoggingError(Box::new(e)))?;

    tracing::info!("Logging to {}", log_dir.display());

    Ok(())
}

/// Shift `app.log` to `app.log.1`, `app.log.1` to `app.log.2`, and so on,
/// dropping whatever would land beyond `KEPT_SESSIONS`
fn shift_session_logs(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let numbered = |n: u8| {
        let mut name = log_path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    };

    let oldest = numbered(KEPT_SESSIONS);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }

    for n in (1..KEPT_SESSIONS).rev() {
        let from = numbered(n);
        if from.exists() {
            std::fs::rename(&from, numbered(n + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;
    Ok(())
}
