//! Identity provider trait abstraction.
//!
//! The identity provider is an external collaborator: it authenticates the
//! user (email/password or Google) and hands back a bearer token for the
//! exam backend. This trait is the seam between that provider and
//! [`crate::auth::AuthService`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// A signed-in session as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySession {
    /// Provider-side user id
    pub user_id: String,
    /// Account email
    pub email: String,
    /// Display name, when the provider knows one
    pub display_name: Option<String>,
    /// Bearer token sent to the exam backend
    pub id_token: String,
    /// Token used to obtain a fresh `id_token`
    pub refresh_token: Option<String>,
    /// When `id_token` stops being accepted
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdentitySession {
    /// Returns true when the token has an expiry in the past.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit clock value.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

/// Trait for identity provider operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, AuthError>;

    /// Create a new email/password account and sign it in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IdentitySession, AuthError>;

    /// Exchange a Google id token (obtained by the platform sign-in UI).
    async fn sign_in_with_google(&self, google_id_token: &str) -> Result<IdentitySession, AuthError>;

    /// Obtain a fresh session from a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AuthError>;

    /// Ask the provider to email a password reset link.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Revoke the provider-side session, if the provider supports it.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
