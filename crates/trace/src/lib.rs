//! Logging macros that call the [`tracing`] crate underneath.
//!
//! Each level can be compiled out through cargo features (`log_info`,
//! `log_warnings`, `log_errors`, `log_debug`). The gate is evaluated when this
//! crate is built, so callers only need to pick features on `fanout_trace`.
//! A disabled level still type-checks and uses its arguments, it just never
//! emits.
//!
//! [`init_subscriber`] installs the process wide `FmtSubscriber` the binaries
//! log through. Logs always go to stderr so demonstration output on stdout
//! stays clean.

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[doc(hidden)]
pub use tracing;

#[cfg(feature = "log_info")]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        $crate::tracing::info!($($t)*)
    };
}

#[cfg(not(feature = "log_info"))]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {{
        if false {
            $crate::tracing::info!($($t)*)
        }
    }};
}

#[cfg(feature = "log_warnings")]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        $crate::tracing::warn!($($t)*)
    };
}

#[cfg(not(feature = "log_warnings"))]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {{
        if false {
            $crate::tracing::warn!($($t)*)
        }
    }};
}

#[cfg(feature = "log_debug")]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        $crate::tracing::debug!($($t)*)
    };
}

#[cfg(not(feature = "log_debug"))]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {{
        if false {
            $crate::tracing::debug!($($t)*)
        }
    }};
}

#[cfg(feature = "log_errors")]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        $crate::tracing::error!($($t)*)
    };
}

#[cfg(not(feature = "log_errors"))]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {{
        if false {
            $crate::tracing::error!($($t)*)
        }
    }};
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("unknown log format {0:?}, expected `compact` or `json`")]
    UnknownFormat(String),

    #[error("invalid log level: {0}")]
    InvalidLevel(#[from] tracing_core::metadata::ParseLevelError),

    #[error("failed to install global subscriber: {0}")]
    InstallFailed(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type TraceResult<T> = std::result::Result<T, TraceError>;

/// Shape of each log line written by the subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TraceError::UnknownFormat(other.to_string())),
        }
    }
}

pub fn parse_level(level: &str) -> TraceResult<Level> {
    Ok(Level::from_str(level.trim())?)
}

/// Installs the global subscriber. Can only succeed once per process.
///
/// # Errors
///
/// Returns [`TraceError::InstallFailed`] when a global subscriber was already set.
pub fn init_subscriber(level: Level, format: LogFormat) -> TraceResult<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(builder.compact().finish())?;
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().finish())?;
        }
    }

    Ok(())
}
