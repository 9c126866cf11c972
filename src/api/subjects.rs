//! `/api/subjects`

use super::client::{decode_list, seg, ApiClient};
use crate::error::AppResult;
use crate::models::{CreateSubjectRequest, Subject, UpdateSubjectRequest};

impl ApiClient {
    /// All subjects, or only those in `group_id`.
    pub async fn list_subjects(&self, group_id: Option<&str>) -> AppResult<Vec<Subject>> {
        let path = match group_id {
            Some(id) => format!("/api/subjects?group_id={}", seg(id)),
            None => "/api/subjects".to_string(),
        };
        let response = self.get_raw(&path).await?;
        decode_list(&response, &["subjects"])
    }

    pub async fn create_subject(&self, request: &CreateSubjectRequest) -> AppResult<Subject> {
        self.post_json("/api/subjects", request).await
    }

    pub async fn get_subject(&self, subject_id: &str) -> AppResult<Subject> {
        self.get_json(&format!("/api/subjects/{}", seg(subject_id)))
            .await
    }

    pub async fn update_subject(
        &self,
        subject_id: &str,
        request: &UpdateSubjectRequest,
    ) -> AppResult<Subject> {
        self.put_json(&format!("/api/subjects/{}", seg(subject_id)), request)
            .await
    }

    pub async fn delete_subject(&self, subject_id: &str) -> AppResult<()> {
        self.delete(&format!("/api/subjects/{}", seg(subject_id)))
            .await
    }
}
