//! Tracing subscriber initialization for applications embedding chatassist.
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! the host application's call.
//!
//! # Usage
//!
//! ```no_run
//! use chatassist_observe::tracing_setup::{LogFormat, init_tracing};
//!
//! // Human-readable output, filtered by RUST_LOG
//! init_tracing(LogFormat::Pretty).unwrap();
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::fmt;
use std::str::FromStr;

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format: '{other}'")),
        }
    }
}

/// Default directive when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "chatassist_core=info,chatassist_types=info";

/// Initialize the global tracing subscriber.
///
/// - Respects `RUST_LOG`; falls back to info-level output for the chatassist
///   crates.
/// - `LogFormat::Json` switches the `fmt` layer to structured JSON lines.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?,
    }

    Ok(())
}
