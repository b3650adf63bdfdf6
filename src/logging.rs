//! Tracing subscriber setup.

use crate::config::Settings;

use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER: OnceLock<()> = OnceLock::new();

/// Logging setup error types.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the level comes from
/// `LOG_LEVEL`. Calling this more than once is a no-op.
pub fn init(settings: &Settings) -> Result<(), LoggingError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(settings.tracing_directive())?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()?;

    let _ = LOGGER.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let cfg = Settings {
            log_level: "warning".to_string(),
            ..Settings::default()
        };
        init(&cfg).unwrap();
        init(&cfg).unwrap();
        tracing::info!("logging initialised twice");
    }
}
