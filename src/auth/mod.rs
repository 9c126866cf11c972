//! Authentication: the process-wide token context, local credential
//! validation and the service that drives the identity provider.

pub mod context;
pub mod service;
pub mod validation;

pub use context::{global, AuthContext, AuthListener, AuthState};
pub use service::AuthService;
pub use validation::{
    validate_email, validate_password, validate_sign_in, validate_sign_up, SignUpForm,
    MIN_PASSWORD_LEN,
};
