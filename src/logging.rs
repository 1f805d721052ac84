//! Logging setup for the application.
//!
//! The terminal is owned by the TUI, so traces go to a per-launch file under
//! the user state directory. `JEWELBOX_LOG` controls the filter.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("no suitable state directory available for logs")]
    NoStateDir,
    #[error("failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to write to a log file.
///
/// Subsequent calls are no-ops. Failures are returned so callers can degrade
/// gracefully without aborting startup.
pub fn init() -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let dir = log_directory().ok_or(LoggingError::NoStateDir)?;
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(&dir, "jewelbox.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("JEWELBOX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let _ = LOG_GUARD.set(guard);
    Ok(())
}

/// `$XDG_STATE_HOME/jewelbox` or `~/.local/state/jewelbox`.
fn log_directory() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = std::env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = std::env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("jewelbox"))
}
