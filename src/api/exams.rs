//! `/api/subjects/{id}/exams`

use super::client::{decode_item, decode_list, seg, ApiClient};
use crate::error::AppResult;
use crate::models::{
    Exam, GenerateExamRequest, GenerateExamResponse, GradingResult, SubmitExamRequest,
    SubmitExamResponse,
};

impl ApiClient {
    fn exams_path(subject_id: &str) -> String {
        format!("/api/subjects/{}/exams", seg(subject_id))
    }

    fn exam_path(subject_id: &str, exam_id: &str) -> String {
        format!("{}/{}", Self::exams_path(subject_id), seg(exam_id))
    }

    /// Start a generation job; the exam appears when the job completes.
    pub async fn generate_exam(
        &self,
        subject_id: &str,
        request: &GenerateExamRequest,
    ) -> AppResult<GenerateExamResponse> {
        self.post_json(&format!("{}/generate", Self::exams_path(subject_id)), request)
            .await
    }

    pub async fn list_exams(&self, subject_id: &str) -> AppResult<Vec<Exam>> {
        let response = self.get_raw(&Self::exams_path(subject_id)).await?;
        decode_list(&response, &["exams"])
    }

    /// Exam with its questions.
    pub async fn get_exam(&self, subject_id: &str, exam_id: &str) -> AppResult<Exam> {
        let response = self.get_raw(&Self::exam_path(subject_id, exam_id)).await?;
        decode_item(&response, "exam")
    }

    pub async fn delete_exam(&self, subject_id: &str, exam_id: &str) -> AppResult<()> {
        self.delete(&Self::exam_path(subject_id, exam_id)).await
    }

    pub async fn submit_exam(
        &self,
        subject_id: &str,
        exam_id: &str,
        request: &SubmitExamRequest,
    ) -> AppResult<SubmitExamResponse> {
        self.post_json(
            &format!("{}/submit", Self::exam_path(subject_id, exam_id)),
            request,
        )
        .await
    }

    pub async fn get_exam_result(&self, subject_id: &str, exam_id: &str) -> AppResult<GradingResult> {
        let response = self
            .get_raw(&format!("{}/result", Self::exam_path(subject_id, exam_id)))
            .await?;
        decode_item(&response, "result")
    }
}
