//! Credentials for a CLI run.

use color_eyre::eyre::{eyre, Result};
use std::sync::Arc;
use tracing::info;

use crate::adapters::RestIdentityProvider;
use crate::auth::{AuthListener, AuthService};
use crate::config::ClientConfig;
use crate::traits::HttpClient;

pub const ENV_TOKEN: &str = "EXAMPREP_TOKEN";
pub const ENV_EMAIL: &str = "EXAMPREP_EMAIL";
pub const ENV_PASSWORD: &str = "EXAMPREP_PASSWORD";

/// How the CLI authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Password { email: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Credentials::Token(..)"),
            Credentials::Password { email, .. } => f
                .debug_struct("Credentials::Password")
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A token wins over an email/password pair.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = get(ENV_TOKEN) {
            return Some(Credentials::Token(token.trim().to_string()));
        }
        match (get(ENV_EMAIL), get(ENV_PASSWORD)) {
            (Some(email), Some(password)) => Some(Credentials::Password { email, password }),
            _ => None,
        }
    }
}

/// Sign in and return the service holding the session.
pub async fn sign_in(
    config: &ClientConfig,
    http: Arc<dyn HttpClient>,
    credentials: &Credentials,
) -> Result<AuthService> {
    let (listener, _context) = AuthListener::new();
    let api_key = config.identity_api_key.clone().unwrap_or_default();
    let mut provider = RestIdentityProvider::new(http, api_key);
    if let Some(url) = &config.identity_base_url {
        provider = provider.with_base_url(url.clone());
    }
    let service = AuthService::new(Arc::new(provider), listener);

    match credentials {
        Credentials::Token(token) => {
            service.restore_token(token);
        }
        Credentials::Password { email, password } => {
            if config.identity_api_key.is_none() {
                return Err(eyre!(
                    "EXAMPREP_IDENTITY_KEY is required to sign in with email and password"
                ));
            }
            service
                .sign_in(email, password)
                .await
                .map_err(|e| eyre!(e.user_message()))?;
            info!("Signed in as {}", email);
        }
    }
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_token_preferred() {
        let creds = Credentials::from_lookup(lookup(&[
            (ENV_TOKEN, " tok "),
            (ENV_EMAIL, "a@b.c"),
            (ENV_PASSWORD, "pw"),
        ]));
        assert_eq!(creds, Some(Credentials::Token("tok".to_string())));
    }

    #[test]
    fn test_password_needs_both() {
        assert!(Credentials::from_lookup(lookup(&[(ENV_EMAIL, "a@b.c")])).is_none());
        assert!(matches!(
            Credentials::from_lookup(lookup(&[(ENV_EMAIL, "a@b.c"), (ENV_PASSWORD, "pw")])),
            Some(Credentials::Password { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let token = format!("{:?}", Credentials::Token("secret".to_string()));
        assert!(!token.contains("secret"));
        let pw = format!(
            "{:?}",
            Credentials::Password {
                email: "a@b.c".to_string(),
                password: "secret".to_string()
            }
        );
        assert!(!pw.contains("secret"));
    }
}
