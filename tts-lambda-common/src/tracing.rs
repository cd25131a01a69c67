//! Tracing initialization for the Lambda function.
//!
//! This module provides utilities for initializing the tracing subscriber
//! with environment-based filtering via the `RUST_LOG` environment variable.
//!
//! # Usage
//!
//! ```no_run
//! use tts_lambda_common::tracing::init_tracing;
//!
//! fn main() {
//!     // Initialize tracing once per cold start
//!     init_tracing();
//!
//!     tracing::info!("Function starting");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=tts_lambda=debug` - Enable debug for the function crate
//!   - `RUST_LOG=warn,tts_lambda_common=debug` - Warn by default, debug for common
//!
//! # Log Format
//!
//! CloudWatch stores each line with its own ingestion timestamp and does not
//! render terminal colors, so lines carry level, target and fields only.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// # Panics
///
/// This function will panic if called more than once, as the global
/// subscriber can only be set once.
pub fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_LOG_LEVEL))
        .with(fmt_layer)
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Unlike `init_tracing()`, this function does not panic if the subscriber
/// is already set, which makes it safe to call from tests.
///
/// # Returns
///
/// - `Ok(())` if initialization succeeded
/// - `Err(())` if the subscriber was already set
pub fn try_init_tracing() -> Result<(), ()> {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_test_writer();

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_LOG_LEVEL))
        .with(fmt_layer)
        .try_init()
        .map_err(|_| ())
}
