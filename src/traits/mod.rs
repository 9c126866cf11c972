//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, DELETE, multipart)
//! - [`IdentityProvider`] - Third-party sign-in and token refresh

pub mod http;
pub mod identity;

pub use http::{Headers, HttpClient, HttpError, MultipartUpload, Response};
pub use identity::{IdentityProvider, IdentitySession};
