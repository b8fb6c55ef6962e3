//! Logging setup for binaries and test harnesses that embed chatassist.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, init_tracing};
