//! Command-line interface for examprep.
//!
//! Local commands (`--version`, `--help`) run without network access. Every
//! other command signs in with credentials from the environment and drives
//! the same view models a graphical shell would.
//!
//! ```ignore
//! use examprep::cli::{parse_args, run_cli_command};
//! use examprep::config::ClientConfig;
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod session;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use session::Credentials;
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::{eyre, Result};

use crate::api::ApiClient;
use crate::config::ClientConfig;

/// Handle commands that need no session.
///
/// Returns `None` for API commands. `Version` never returns.
pub fn run_local_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::Invalid(message) => Some(Err(eyre!("{}\n\n{}", message, USAGE))),
        _ => None,
    }
}

/// Run any command, signing in first when it talks to the backend.
pub async fn run_cli_command(command: CliCommand, config: &ClientConfig) -> Result<()> {
    if let Some(result) = run_local_command(&command) {
        return result;
    }

    let credentials = Credentials::from_env().ok_or_else(|| {
        eyre!(
            "Not signed in: set {} or {} and {}",
            session::ENV_TOKEN,
            session::ENV_EMAIL,
            session::ENV_PASSWORD
        )
    })?;

    let http = config.build_http_client().map_err(|e| eyre!(e.user_message()))?;
    let service = session::sign_in(config, http.clone(), &credentials).await?;
    let api = ApiClient::new(config.api_base_url.clone(), http, service.context());

    let result = commands::run_command(&command, api, config).await;
    service.detach();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_is_local() {
        assert!(matches!(run_local_command(&CliCommand::Help), Some(Ok(()))));
    }

    #[test]
    fn test_invalid_is_error() {
        let result = run_local_command(&CliCommand::Invalid("unknown command: foo".to_string()));
        let err = result.expect("local").expect_err("invalid");
        assert!(err.to_string().contains("unknown command: foo"));
    }

    #[test]
    fn test_api_commands_are_not_local() {
        assert!(run_local_command(&CliCommand::Subjects).is_none());
        assert!(run_local_command(&CliCommand::Exams {
            subject: "s1".to_string()
        })
        .is_none());
    }
}
