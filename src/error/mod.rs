//! Unified error handling.
//!
//! - **Categories**: how a screen presents the failure
//! - **Domain errors**: network, auth, validation, state, system
//! - **`AppError`**: the single error type view-state holders deal in
//! - **`ErrorContext`**: operation/resource metadata for logs
//!
//! | Category | Raised by | Retryable |
//! |----------|-----------|-----------|
//! | Network | transport failures, non-2xx responses | Yes (except 4xx) |
//! | Server | 5xx responses | Yes |
//! | Auth | identity provider, missing token, 401 | No |
//! | Validation | forms, before any request | No |
//! | State | holder not ready for the action | No |
//! | System | reading files to upload | No |

mod app_error;
mod auth;
mod category;
mod context;
mod network;
mod result;
mod state;
mod system;
mod validation;

pub use app_error::AppError;
pub use auth::AuthError;
pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use network::{classify_http_error, classify_reqwest_error, NetworkError};
pub use result::{AppResult, ResultExt};
pub use state::StateError;
pub use system::{classify_io_error, SystemError};
pub use validation::ValidationError;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_every_kind_has_message_and_code() {
        let errors: Vec<AppError> = vec![
            NetworkError::Cancelled.into(),
            AuthError::NotAuthenticated.into(),
            ValidationError::NoFiles.into(),
            StateError::Disposed.into(),
            SystemError::FileNotFound {
                path: std::path::PathBuf::from("/x.pdf"),
            }
            .into(),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?}", err);
            assert!(err.error_code().starts_with("E_"), "{:?}", err);
            assert!(!err.recovery_hint().is_empty());
        }
    }
}
