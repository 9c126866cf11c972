//! Sign-in orchestration.
//!
//! [`AuthService`] owns the [`AuthListener`], so it is the only code path that
//! changes the authentication state. Credentials are validated locally before
//! the identity provider is called.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::context::{AuthContext, AuthListener};
use super::validation::{validate_email, validate_sign_in, validate_sign_up, SignUpForm};
use crate::adapters::rest_identity::session_from_token;
use crate::error::{AppResult, AuthError};
use crate::traits::{IdentityProvider, IdentitySession};

/// Tokens this close to expiry are refreshed early.
const EXPIRY_SKEW_SECS: i64 = 60;

pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    listener: AuthListener,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, listener: AuthListener) -> Self {
        Self { provider, listener }
    }

    /// Reader on the state this service writes.
    pub fn context(&self) -> AuthContext {
        self.listener.context()
    }

    pub fn current_token(&self) -> Option<String> {
        self.context().token()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<IdentitySession> {
        validate_sign_in(email, password)?;
        let session = self
            .provider
            .sign_in_with_password(email.trim(), password)
            .await?;
        self.listener.signed_in(session.clone());
        Ok(session)
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> AppResult<IdentitySession> {
        validate_sign_up(form)?;
        let display_name = Some(form.display_name.trim()).filter(|n| !n.is_empty());
        let session = self
            .provider
            .sign_up(form.email.trim(), &form.password, display_name)
            .await?;
        self.listener.signed_in(session.clone());
        Ok(session)
    }

    /// Exchange the id token produced by the platform Google sign-in flow.
    pub async fn sign_in_with_google(&self, google_id_token: Option<&str>) -> AppResult<IdentitySession> {
        let token = google_id_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::GoogleSignInCancelled)?;
        let session = self.provider.sign_in_with_google(token).await?;
        self.listener.signed_in(session.clone());
        Ok(session)
    }

    pub async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        validate_email(email)?;
        self.provider.send_password_reset(email.trim()).await?;
        info!("Password reset requested");
        Ok(())
    }

    /// Adopt an externally obtained bearer token (CLI, tests).
    pub fn restore_token(&self, token: &str) -> IdentitySession {
        let session = session_from_token(token);
        self.listener.signed_in(session.clone());
        session
    }

    /// Clears the local state even if the provider call fails.
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            warn!("Provider sign-out failed: {}", e);
        }
        self.listener.signed_out();
    }

    /// Refresh the session when its token has expired (or is about to).
    ///
    /// Returns the token to use. An expired session without a refresh
    /// token, or a rejected refresh, signs the user out.
    pub async fn refresh_if_expired(&self) -> AppResult<String> {
        let session = self.context().session().ok_or(AuthError::NotAuthenticated)?;
        let threshold = Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS);
        if !session.is_expired_at(threshold) {
            return Ok(session.id_token);
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.listener.signed_out();
            return Err(AuthError::TokenExpired.into());
        };

        match self.provider.refresh(refresh_token).await {
            Ok(mut fresh) => {
                if fresh.email.is_empty() {
                    fresh.email = session.email.clone();
                }
                if fresh.display_name.is_none() {
                    fresh.display_name = session.display_name.clone();
                }
                let token = fresh.id_token.clone();
                self.listener.signed_in(fresh);
                info!("Refreshed identity token");
                Ok(token)
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                if e.requires_reauth() {
                    self.listener.signed_out();
                }
                Err(e.into())
            }
        }
    }

    /// Tear down the listener; every reader ends up signed out.
    pub fn detach(self) {
        self.listener.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{IdentityCall, MockIdentityProvider};
    use crate::error::{AppError, ValidationError};

    fn service() -> (AuthService, MockIdentityProvider) {
        let provider = MockIdentityProvider::new();
        let (listener, _context) = AuthListener::new();
        (AuthService::new(Arc::new(provider.clone()), listener), provider)
    }

    fn sign_up_form(password: &str) -> SignUpForm {
        SignUpForm {
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            display_name: "Ada".to_string(),
        }
    }

    #[tokio::test]
    async fn test_short_password_rejected_before_provider() {
        let (service, provider) = service();
        let err = service.sign_up(&sign_up_form("abc12")).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation(ValidationError::PasswordTooShort { min: 6 })
        ));
        assert!(err.user_message().contains("at least 6 characters"));
        assert!(provider.calls().is_empty());
        assert!(service.current_token().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_publishes_session() {
        let (service, provider) = service();
        let session = service.sign_up(&sign_up_form("abc123")).await.unwrap();

        assert_eq!(session.display_name.as_deref(), Some("Ada"));
        assert_eq!(service.current_token().as_deref(), Some("token-ada@example.com"));
        assert_eq!(
            provider.calls(),
            vec![IdentityCall::SignUp {
                email: "ada@example.com".to_string(),
                display_name: Some("Ada".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_provider_rejection_is_auth_error() {
        let (service, provider) = service();
        provider.set_sign_in_result(Err(AuthError::InvalidCredentials));

        let err = service.sign_in("ada@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
        assert!(!service.context().is_signed_in());
    }

    #[tokio::test]
    async fn test_google_without_token_is_cancelled() {
        let (service, provider) = service();
        let err = service.sign_in_with_google(None).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::GoogleSignInCancelled)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_clears_token() {
        let (service, _provider) = service();
        service.sign_in("ada@example.com", "secret1").await.unwrap();
        service.sign_out().await;
        assert!(service.current_token().is_none());
    }

    #[tokio::test]
    async fn test_fresh_token_not_refreshed() {
        let (service, provider) = service();
        service.sign_in("ada@example.com", "secret1").await.unwrap();
        let token = service.refresh_if_expired().await.unwrap();
        assert_eq!(token, "token-ada@example.com");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_refreshed() {
        let (service, provider) = service();
        let mut expired = MockIdentityProvider::session_for("ada@example.com");
        expired.expires_at = Some(Utc::now() - Duration::seconds(5));
        provider.set_sign_in_result(Ok(expired));

        let mut fresh = MockIdentityProvider::session_for("ada@example.com");
        fresh.id_token = "fresh-token".to_string();
        fresh.email = String::new();
        provider.set_refresh_result(Ok(fresh));

        service.sign_in("ada@example.com", "secret1").await.unwrap();
        let token = service.refresh_if_expired().await.unwrap();

        assert_eq!(token, "fresh-token");
        let session = service.context().session().unwrap();
        assert_eq!(session.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_signs_out() {
        let (service, provider) = service();
        let mut expired = MockIdentityProvider::session_for("ada@example.com");
        expired.expires_at = Some(Utc::now() - Duration::seconds(5));
        expired.refresh_token = None;
        provider.set_sign_in_result(Ok(expired));

        service.sign_in("ada@example.com", "secret1").await.unwrap();
        let err = service.refresh_if_expired().await.unwrap_err();
        assert!(err.requires_reauth());
        assert!(!service.context().is_signed_in());
    }

    #[tokio::test]
    async fn test_password_reset_validates_email() {
        let (service, provider) = service();
        assert!(service.send_password_reset("nope").await.is_err());
        assert!(provider.calls().is_empty());
        service.send_password_reset("ada@example.com").await.unwrap();
        assert_eq!(provider.calls().len(), 1);
    }
}
