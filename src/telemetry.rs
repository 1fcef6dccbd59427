//! Tracing subscriber installation for hosts embedding the crate.
//!
//! Library code only emits `tracing` events. Binaries and tests that want
//! to see them call [`init_tracing`] once at start-up.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "labtrack=info";

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid tracing filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_FILTER`] when `RUST_LOG` is unset or empty.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is malformed or a subscriber
/// has already been installed for this process.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
    let env_filter = EnvFilter::try_new(directive)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init()?;
    Ok(())
}
