//! Logging setup for the server.
//!
//! Installs a global tracing subscriber writing to stdout. The filter defaults
//! to `info` and can be overridden with `RUST_LOG`. Records emitted through the
//! `log` facade (actix's access logger) are forwarded into the same subscriber.

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install global tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

pub fn init() -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stdout))
        .try_init()?;
    Ok(())
}
