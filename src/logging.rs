//! Logging configuration for schemalens.
//!
//! Logs go to stderr by default, or to a file when the shell should keep its
//! output clean. The filter is installed behind a reload layer so the `log`
//! command can change the level of a running session.

use crate::error::{LensError, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for changing the active log filter.
///
/// A detached handle (no subscriber installed) only validates levels, which
/// keeps the `log` command usable in tests and embedded sessions.
#[derive(Clone, Default)]
pub struct LogHandle {
    reload: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// A handle that is not connected to any subscriber.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Replaces the active filter with `level` (a level name or directive).
    pub fn set_level(&self, level: &str) -> Result<()> {
        let filter = parse_filter(level)?;
        if let Some(handle) = &self.reload {
            handle
                .reload(filter)
                .map_err(|e| LensError::internal(format!("Cannot change log level: {e}")))?;
        }
        tracing::info!("Log level set to {}", level);
        Ok(())
    }
}

/// Validates a filter directive such as `debug` or `schema_lens=trace`.
pub fn parse_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| LensError::option("level", format!("'{level}' is not a log level: {e}")))
}

/// `RUST_LOG` wins over the configured level.
fn initial_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(level: &str) -> LogHandle {
    let (filter, handle) = reload::Layer::new(initial_filter(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    LogHandle {
        reload: Some(handle),
    }
}

/// Initializes logging to the log file.
///
/// Location: `~/.local/state/schemalens/schemalens.log` on Linux, or the
/// platform-appropriate state/config directory elsewhere. Falls back to stderr
/// when the file cannot be created.
pub fn init_file_logging(level: &str) -> LogHandle {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return init_stderr_logging(level);
        }
    }

    // Truncate on each run
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return init_stderr_logging(level);
        }
    };

    let (filter, handle) = reload::Layer::new(initial_filter(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    LogHandle {
        reload: Some(handle),
    }
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("schemalens").join("schemalens.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("schemalens").join("schemalens.log");
    }

    std::env::temp_dir().join("schemalens.log")
}
