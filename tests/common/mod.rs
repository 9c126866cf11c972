//! Shared fixtures for the integration tests.
//!
//! Every test talks to a wiremock server through the real reqwest
//! transport, signed in with a fixed bearer token.

#![allow(dead_code)]

use std::sync::Arc;

use examprep::adapters::ReqwestHttpClient;
use examprep::api::ApiClient;
use examprep::auth::AuthListener;
use examprep::traits::IdentitySession;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-id-token";

/// A signed-in API client pointed at a mock server. Keep the listener
/// alive for as long as the client is used.
pub struct TestBackend {
    pub server: MockServer,
    pub api: ApiClient,
    _listener: AuthListener,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let (listener, context) = AuthListener::new();
        listener.signed_in(test_session());
        let api = ApiClient::new(server.uri(), Arc::new(ReqwestHttpClient::new()), context);
        Self {
            server,
            api,
            _listener: listener,
        }
    }

    /// Serve the subject's generation and grading job lists.
    pub async fn mount_jobs(&self, subject_id: &str, exam_jobs: Value, grading_jobs: Value) {
        for (segment, body) in [("exam-jobs", exam_jobs), ("grading-jobs", grading_jobs)] {
            Mock::given(method("GET"))
                .and(path(format!("/api/subjects/{}/{}", subject_id, segment)))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server)
                .await;
        }
    }

    /// Requests the server received for one method and path.
    pub async fn count(&self, method: &str, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .count()
    }
}

pub fn test_session() -> IdentitySession {
    IdentitySession {
        user_id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        display_name: Some("Ada".to_string()),
        id_token: TOKEN.to_string(),
        refresh_token: None,
        expires_at: None,
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

pub fn subject_json(id: &str, name: &str, group_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "group_id": group_id,
        "pdf_count": 2,
        "exam_count": 1,
        "created_at": "2026-03-01T10:00:00Z"
    })
}

pub fn job_json(id: &str, status: &str, progress: u8) -> Value {
    json!({
        "id": id,
        "status": status,
        "progress": progress,
        "created_at": "2026-03-01T10:00:00Z"
    })
}

/// The three-exam subject: one graded, one generating, one draft.
pub fn three_exams_json() -> Value {
    json!({
        "exams": [
            {
                "id": "exam-graded-000001",
                "title": "Cell biology",
                "question_count": 10,
                "difficulty": "medium",
                "status": "completed",
                "submission": {
                    "id": "sub-1",
                    "status": "graded",
                    "score": 8,
                    "max_score": 10,
                    "percentage": 80
                }
            },
            {
                "id": "exam-running-000002",
                "title": "Genetics",
                "question_count": 5,
                "difficulty": "hard",
                "status": "processing",
                "latest_job": {"id": "job-2", "status": "processing", "progress": 40}
            },
            {
                "id": "exam-draft-000003",
                "title": "",
                "question_count": 0,
                "status": "draft"
            }
        ]
    })
}
