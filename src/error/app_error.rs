//! Unified error type for the exam client.
//!
//! Every remote call made by a view-state holder is converted into an
//! `AppError` and then into a message for the screen; raw transport errors
//! never reach the presentation layer.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::{classify_http_error, NetworkError};
use super::state::StateError;
use super::system::SystemError;
use super::validation::ValidationError;
use crate::traits::HttpError;

/// Unified error type.
#[derive(Debug)]
pub enum AppError {
    /// Connectivity or HTTP failure talking to the backend.
    Network(NetworkError),

    /// Identity provider rejection or missing credentials.
    Auth(AuthError),

    /// Input rejected before any request was made.
    Validation(ValidationError),

    /// Action not valid in the holder's current state.
    State(StateError),

    /// Local filesystem failure.
    System(SystemError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<AppError>,
        context: ErrorContext,
    },
}

impl AppError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Network(err) if err.is_server_error() => ErrorCategory::Server,
            AppError::Network(NetworkError::HttpStatus { status: 401, .. }) => ErrorCategory::Auth,
            AppError::Network(_) => ErrorCategory::Network,
            AppError::Auth(_) => ErrorCategory::Auth,
            AppError::Validation(_) => ErrorCategory::Validation,
            AppError::State(_) => ErrorCategory::State,
            AppError::System(_) => ErrorCategory::System,
            AppError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if a manual retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(err) => err.is_retryable(),
            AppError::WithContext { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    /// Message shown in a banner, snackbar or inline form error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(err) => err.user_message(),
            AppError::Auth(err) => err.user_message(),
            AppError::Validation(err) => err.user_message(),
            AppError::State(err) => err.user_message(),
            AppError::System(err) => err.user_message(),
            AppError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network(err) => err.error_code(),
            AppError::Auth(err) => err.error_code(),
            AppError::Validation(err) => err.error_code(),
            AppError::State(err) => err.error_code(),
            AppError::System(err) => err.error_code(),
            AppError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        AppError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            AppError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &AppError {
        match self {
            AppError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Check if the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            AppError::Auth(err) => err.requires_reauth(),
            AppError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            AppError::WithContext { error, .. } => error.requires_reauth(),
            _ => false,
        }
    }

    /// HTTP status of the underlying response, if the backend answered.
    pub fn http_status(&self) -> Option<u16> {
        match self.inner() {
            AppError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// True when the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    /// Recovery hint for the error's category.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(err) => write!(f, "{}", err),
            AppError::Auth(err) => write!(f, "{}", err),
            AppError::Validation(err) => write!(f, "{}", err),
            AppError::State(err) => write!(f, "{}", err),
            AppError::System(err) => write!(f, "{}", err),
            AppError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::State(err) => Some(err),
            AppError::System(err) => Some(err),
            AppError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        AppError::Network(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        AppError::State(err)
    }
}

impl From<SystemError> for AppError {
    fn from(err: SystemError) -> Self {
        AppError::System(err)
    }
}

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        AppError::Network(classify_http_error(&err, "unknown"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use super::system::classify_io_error;
        AppError::System(classify_io_error(err, None, "I/O operation"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        AppError::Network(super::network::classify_reqwest_error(&err, &url))
    }
}
