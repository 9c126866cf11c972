use examprep::cli::{parse_args, run_cli_command};
use examprep::config::ClientConfig;
use examprep::telemetry::init_tracing;

use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = ClientConfig::from_env();
    init_tracing(&config)?;

    let command = parse_args(std::env::args());
    tracing::debug!("Running {:?}", command);
    run_cli_command(command, &config).await
}
