//! `/api/subjects/{id}/exam-jobs` and `/api/subjects/{id}/grading-jobs`

use super::client::{decode, decode_item, decode_list, seg, ApiClient};
use crate::error::AppResult;
use crate::models::{Job, JobKind};

impl ApiClient {
    fn jobs_path(subject_id: &str, kind: JobKind) -> String {
        format!("/api/subjects/{}/{}", seg(subject_id), kind.path_segment())
    }

    /// Jobs of one kind for a subject. Each job's `kind` is set from the
    /// endpoint, since list rows often omit it.
    pub async fn list_jobs(&self, subject_id: &str, kind: JobKind) -> AppResult<Vec<Job>> {
        let response = self.get_raw(&Self::jobs_path(subject_id, kind)).await?;
        let mut jobs: Vec<Job> = decode_list(&response, &["jobs"])?;
        for job in &mut jobs {
            job.kind = kind;
        }
        Ok(jobs)
    }

    pub async fn get_job(&self, subject_id: &str, kind: JobKind, job_id: &str) -> AppResult<Job> {
        let response = self
            .get_raw(&format!("{}/{}", Self::jobs_path(subject_id, kind), seg(job_id)))
            .await?;
        let mut job: Job = decode_item(&response, "job")?;
        job.kind = kind;
        Ok(job)
    }

    /// Ask the backend to cancel a job. Returns the updated job when the
    /// backend sends one back.
    pub async fn cancel_job(
        &self,
        subject_id: &str,
        kind: JobKind,
        job_id: &str,
    ) -> AppResult<Option<Job>> {
        let path = format!(
            "{}/{}/cancel",
            Self::jobs_path(subject_id, kind),
            seg(job_id)
        );
        let response = self.post_raw(&path, &serde_json::json!({})).await?;
        if response.body.is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = decode(&response)?;
        let value = value.get("job").cloned().unwrap_or(value);
        // Some deployments answer with a bare acknowledgement
        let job = serde_json::from_value::<Job>(value).ok().map(|mut job| {
            job.kind = kind;
            job
        });
        Ok(job)
    }

    pub async fn list_exam_jobs(&self, subject_id: &str) -> AppResult<Vec<Job>> {
        self.list_jobs(subject_id, JobKind::Generation).await
    }

    pub async fn get_exam_job(&self, subject_id: &str, job_id: &str) -> AppResult<Job> {
        self.get_job(subject_id, JobKind::Generation, job_id).await
    }

    pub async fn cancel_exam_job(&self, subject_id: &str, job_id: &str) -> AppResult<Option<Job>> {
        self.cancel_job(subject_id, JobKind::Generation, job_id).await
    }

    pub async fn list_grading_jobs(&self, subject_id: &str) -> AppResult<Vec<Job>> {
        self.list_jobs(subject_id, JobKind::Grading).await
    }

    pub async fn get_grading_job(&self, subject_id: &str, job_id: &str) -> AppResult<Job> {
        self.get_job(subject_id, JobKind::Grading, job_id).await
    }

    pub async fn cancel_grading_job(&self, subject_id: &str, job_id: &str) -> AppResult<Option<Job>> {
        self.cancel_job(subject_id, JobKind::Grading, job_id).await
    }
}
