//! Client-side validation failures.
//!
//! These are raised before any network call is attempted.

use thiserror::Error;

/// A form or request rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("Select at least one PDF")]
    NoPdfSelected,

    #[error("Model {model} is not offered by {provider}")]
    UnsupportedModel { provider: String, model: String },

    #[error("Selected group no longer exists")]
    UnknownGroup { group_id: String },

    #[error("No files selected")]
    NoFiles,

    #[error("{file_name} is not a PDF")]
    NotPdf { file_name: String },

    #[error("Language {code} is not supported")]
    UnsupportedLanguage { code: String },
}

impl ValidationError {
    /// Message shown inline next to the form field.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "E_VAL_REQUIRED",
            ValidationError::TooLong { .. } => "E_VAL_TOO_LONG",
            ValidationError::PasswordTooShort { .. } => "E_VAL_PASSWORD_LEN",
            ValidationError::PasswordMismatch => "E_VAL_PASSWORD_MISMATCH",
            ValidationError::InvalidEmail => "E_VAL_EMAIL",
            ValidationError::OutOfRange { .. } => "E_VAL_RANGE",
            ValidationError::NoPdfSelected => "E_VAL_NO_PDF",
            ValidationError::UnsupportedModel { .. } => "E_VAL_MODEL",
            ValidationError::UnknownGroup { .. } => "E_VAL_GROUP",
            ValidationError::NoFiles => "E_VAL_NO_FILES",
            ValidationError::NotPdf { .. } => "E_VAL_NOT_PDF",
            ValidationError::UnsupportedLanguage { .. } => "E_VAL_LANGUAGE",
        }
    }
}
