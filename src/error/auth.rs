//! Authentication-related error types.
//!
//! Failures reported by the identity provider, and the client's own
//! "no token available" condition.

use std::fmt;

/// Provider code used when the identity service could not be reached.
pub const NETWORK_REQUEST_FAILED: &str = "NETWORK_REQUEST_FAILED";

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No signed-in user; an authenticated call was attempted without a token.
    NotAuthenticated,

    /// Email/password pair rejected.
    InvalidCredentials,

    /// No account exists for the email.
    UserNotFound,

    /// Sign-up with an email that already has an account.
    EmailAlreadyInUse,

    /// Provider refused the password (its own policy, after local checks).
    WeakPassword { message: String },

    /// Account disabled by an administrator.
    UserDisabled,

    /// Provider throttled sign-in attempts.
    TooManyAttempts,

    /// The Google sign-in was cancelled or returned no id token.
    GoogleSignInCancelled,

    /// Stored token has expired and no refresh was possible.
    TokenExpired,

    /// Refresh token rejected.
    RefreshFailed { message: String },

    /// Any other provider error code.
    Provider { code: String, message: String },
}

impl AuthError {
    /// Map an identity-toolkit style error code (`EMAIL_NOT_FOUND`,
    /// `WEAK_PASSWORD : Password should be at least 6 characters`...) to a variant.
    pub fn from_provider_code(raw: &str) -> Self {
        let (code, detail) = match raw.split_once(':') {
            Some((code, detail)) => (code.trim(), detail.trim()),
            None => (raw.trim(), ""),
        };
        match code {
            "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
                AuthError::InvalidCredentials
            }
            "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthError::WeakPassword {
                message: detail.to_string(),
            },
            "USER_DISABLED" => AuthError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" => {
                AuthError::RefreshFailed {
                    message: code.to_string(),
                }
            }
            _ => AuthError::Provider {
                code: code.to_string(),
                message: detail.to_string(),
            },
        }
    }

    /// Transport failure talking to the identity provider.
    pub fn network(message: impl Into<String>) -> Self {
        AuthError::Provider {
            code: NETWORK_REQUEST_FAILED.to_string(),
            message: message.into(),
        }
    }

    /// Whether the user must go back to the sign-in screen.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::TokenExpired | AuthError::RefreshFailed { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => "Please sign in to continue.".to_string(),
            AuthError::InvalidCredentials => "Incorrect email or password.".to_string(),
            AuthError::UserNotFound => "No account found for this email.".to_string(),
            AuthError::EmailAlreadyInUse => {
                "An account with this email already exists.".to_string()
            }
            AuthError::WeakPassword { message } if !message.is_empty() => message.clone(),
            AuthError::WeakPassword { .. } => "Please choose a stronger password.".to_string(),
            AuthError::UserDisabled => "This account has been disabled.".to_string(),
            AuthError::TooManyAttempts => {
                "Too many attempts. Please wait a few minutes and try again.".to_string()
            }
            AuthError::GoogleSignInCancelled => "Google sign-in was cancelled.".to_string(),
            AuthError::TokenExpired | AuthError::RefreshFailed { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthError::Provider { code, .. } if code == NETWORK_REQUEST_FAILED => {
                "Unable to reach the sign-in service. Please check your connection.".to_string()
            }
            AuthError::Provider { code, .. } => format!("Sign-in failed ({}).", code),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::InvalidCredentials => "E_AUTH_INVALID",
            AuthError::UserNotFound => "E_AUTH_NO_USER",
            AuthError::EmailAlreadyInUse => "E_AUTH_EXISTS",
            AuthError::WeakPassword { .. } => "E_AUTH_WEAK",
            AuthError::UserDisabled => "E_AUTH_DISABLED",
            AuthError::TooManyAttempts => "E_AUTH_THROTTLED",
            AuthError::GoogleSignInCancelled => "E_AUTH_GOOGLE_CANCEL",
            AuthError::TokenExpired => "E_AUTH_TOKEN_EXP",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH",
            AuthError::Provider { .. } => "E_AUTH_PROVIDER",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::EmailAlreadyInUse => write!(f, "Email already in use"),
            AuthError::WeakPassword { message } => write!(f, "Weak password: {}", message),
            AuthError::UserDisabled => write!(f, "User disabled"),
            AuthError::TooManyAttempts => write!(f, "Too many attempts"),
            AuthError::GoogleSignInCancelled => write!(f, "Google sign-in cancelled"),
            AuthError::TokenExpired => write!(f, "Token expired"),
            AuthError::RefreshFailed { message } => write!(f, "Token refresh failed: {}", message),
            AuthError::Provider { code, message } => {
                write!(f, "Identity provider error {}: {}", code, message)
            }
        }
    }
}

impl std::error::Error for AuthError {}
