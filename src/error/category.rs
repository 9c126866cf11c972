//! Error category classification.
//!
//! Categories decide how a screen presents a failure: a dismissible banner
//! with a retry affordance, an inline form message, or a sign-in prompt.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connectivity problems, timeouts, rejected HTTP requests.
    Network,

    /// Identity provider rejection or missing/expired credentials.
    Auth,

    /// Backend returned a 5xx.
    Server,

    /// Client-side input check failed before any request was issued.
    Validation,

    /// Operation not allowed in the holder's current state.
    State,

    /// Local filesystem problems (reading a file to upload).
    System,
}

impl ErrorCategory {
    /// Returns true if a manual retry of the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Validation => "validation",
            ErrorCategory::State => "state",
            ErrorCategory::System => "system",
        }
    }

    /// Suggested recovery action shown next to the message.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and tap retry",
            ErrorCategory::Auth => "Sign in again to continue",
            ErrorCategory::Server => "The server is having trouble. Please try again later",
            ErrorCategory::Validation => "Please check your input and try again",
            ErrorCategory::State => "Reload the screen and try again",
            ErrorCategory::System => "Check that the file exists and is readable",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
        assert!(!ErrorCategory::State.is_retryable());
        assert!(!ErrorCategory::System.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::State.to_string(), "state");
    }
}
