//! examprep - client library for an AI exam-generation service.
//!
//! Typed REST client, authentication context, and per-screen view models
//! for groups, subjects, PDFs, exams, jobs and grading results.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod traits;
pub mod view_state;
