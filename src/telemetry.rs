//! Tracing subscriber setup for the binary.

use color_eyre::eyre::eyre;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ClientConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(config: &ClientConfig) -> color_eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder
            .json()
            .try_init()
            .map_err(|err| eyre!(err.to_string()))?;
    } else {
        builder.try_init().map_err(|err| eyre!(err.to_string()))?;
    }

    Ok(())
}
