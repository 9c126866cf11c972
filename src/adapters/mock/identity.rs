//! Mock identity provider for testing.
//!
//! Records every call and answers with whatever outcome the test configured.
//! Unconfigured sign-in and sign-up calls succeed with a session derived from
//! the email, so tests only configure the failures they care about.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::AuthError;
use crate::traits::{IdentityProvider, IdentitySession};

/// One call made to the mock provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    SignIn { email: String },
    SignUp { email: String, display_name: Option<String> },
    Google,
    Refresh { refresh_token: String },
    PasswordReset { email: String },
    SignOut,
}

#[derive(Debug, Default)]
struct Outcomes {
    sign_in: Option<Result<IdentitySession, AuthError>>,
    sign_up: Option<Result<IdentitySession, AuthError>>,
    google: Option<Result<IdentitySession, AuthError>>,
    refresh: Option<Result<IdentitySession, AuthError>>,
    password_reset: Option<Result<(), AuthError>>,
}

/// In-memory [`IdentityProvider`].
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    outcomes: Arc<Mutex<Outcomes>>,
    calls: Arc<Mutex<Vec<IdentityCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose token is `token-<email>`.
    pub fn session_for(email: &str) -> IdentitySession {
        IdentitySession {
            user_id: format!("uid-{}", email),
            email: email.to_string(),
            display_name: None,
            id_token: format!("token-{}", email),
            refresh_token: Some(format!("refresh-{}", email)),
            expires_at: None,
        }
    }

    pub fn set_sign_in_result(&self, result: Result<IdentitySession, AuthError>) {
        lock(&self.outcomes).sign_in = Some(result);
    }

    pub fn set_sign_up_result(&self, result: Result<IdentitySession, AuthError>) {
        lock(&self.outcomes).sign_up = Some(result);
    }

    pub fn set_google_result(&self, result: Result<IdentitySession, AuthError>) {
        lock(&self.outcomes).google = Some(result);
    }

    pub fn set_refresh_result(&self, result: Result<IdentitySession, AuthError>) {
        lock(&self.outcomes).refresh = Some(result);
    }

    pub fn set_password_reset_result(&self, result: Result<(), AuthError>) {
        lock(&self.outcomes).password_reset = Some(result);
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<IdentityCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: IdentityCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<IdentitySession, AuthError> {
        self.record(IdentityCall::SignIn {
            email: email.to_string(),
        });
        lock(&self.outcomes)
            .sign_in
            .clone()
            .unwrap_or_else(|| Ok(Self::session_for(email)))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        display_name: Option<&str>,
    ) -> Result<IdentitySession, AuthError> {
        self.record(IdentityCall::SignUp {
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
        });
        lock(&self.outcomes).sign_up.clone().unwrap_or_else(|| {
            let mut session = Self::session_for(email);
            session.display_name = display_name.map(str::to_string);
            Ok(session)
        })
    }

    async fn sign_in_with_google(&self, _google_id_token: &str) -> Result<IdentitySession, AuthError> {
        self.record(IdentityCall::Google);
        lock(&self.outcomes)
            .google
            .clone()
            .unwrap_or_else(|| Ok(Self::session_for("google-user@example.com")))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AuthError> {
        self.record(IdentityCall::Refresh {
            refresh_token: refresh_token.to_string(),
        });
        lock(&self.outcomes)
            .refresh
            .clone()
            .unwrap_or_else(|| Err(AuthError::RefreshFailed {
                message: "no refresh outcome configured".to_string(),
            }))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.record(IdentityCall::PasswordReset {
            email: email.to_string(),
        });
        lock(&self.outcomes).password_reset.clone().unwrap_or(Ok(()))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record(IdentityCall::SignOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_sign_in_succeeds() {
        let provider = MockIdentityProvider::new();
        let session = provider
            .sign_in_with_password("a@b.co", "secret1")
            .await
            .unwrap();
        assert_eq!(session.id_token, "token-a@b.co");
        assert_eq!(
            provider.calls(),
            vec![IdentityCall::SignIn {
                email: "a@b.co".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let provider = MockIdentityProvider::new();
        provider.set_sign_in_result(Err(AuthError::InvalidCredentials));
        let result = provider.sign_in_with_password("a@b.co", "wrong!").await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }
}
