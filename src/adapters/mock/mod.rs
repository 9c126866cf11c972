//! Mock implementations for testing.
//!
//! These doubles let view-state holders and the API client be exercised
//! without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockIdentityProvider`] - identity provider with configurable outcomes

pub mod http;
pub mod identity;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use identity::{IdentityCall, MockIdentityProvider};
