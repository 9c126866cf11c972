//! REST client for the exam backend.
//!
//! [`ApiClient`] carries the transport and the bearer token; resource
//! methods are split by path prefix:
//!
//! - groups: `/api/groups[/{id}]`
//! - subjects: `/api/subjects[/{id}]`
//! - pdfs: `/api/subjects/{id}/pdfs[...]`, `/api/pdf/list`, `/api/pdf/{id}`
//! - exams: `/api/subjects/{id}/exams[...]`
//! - jobs: `/api/subjects/{id}/exam-jobs[...]`, `/api/subjects/{id}/grading-jobs[...]`
//! - user: `/api/user/profile`, `/api/user/languages`

mod client;
mod exams;
mod groups;
mod jobs;
mod pdfs;
mod subjects;
mod user;

pub use client::ApiClient;
