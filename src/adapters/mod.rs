//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`RestIdentityProvider`] - identity-toolkit REST sign-in
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for both:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockIdentityProvider`] - Configurable sign-in outcomes

pub mod mock;
pub mod reqwest_http;
pub mod rest_identity;

pub use mock::{MockHttpClient, MockIdentityProvider, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
pub use rest_identity::{jwt_expiry, session_from_token, RestIdentityProvider};
