//! Subject screen: its PDFs and its generation/grading jobs.

use tracing::info;

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use super::upload::{UploadFile, UploadQueue, UploadReport};
use crate::api::ApiClient;
use crate::error::{AppResult, StateError};
use crate::models::{Job, JobKind, PdfDocument, Subject};
use crate::view_state::JobView;

#[derive(Debug, Clone, Default)]
pub struct SubjectDetailState {
    pub subject: Resource<Subject>,
    pub pdfs: Resource<Vec<PdfDocument>>,
    pub exam_jobs: Resource<Vec<Job>>,
    pub grading_jobs: Resource<Vec<Job>>,
    pub notice: Option<String>,
}

impl SubjectDetailState {
    /// Both job lists merged, newest first.
    pub fn job_views(&self) -> Vec<JobView> {
        let mut jobs: Vec<&Job> = self
            .exam_jobs
            .data()
            .into_iter()
            .chain(self.grading_jobs.data())
            .flatten()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.into_iter().map(JobView::new).collect()
    }

    pub fn active_job_count(&self) -> usize {
        self.exam_jobs
            .data()
            .into_iter()
            .chain(self.grading_jobs.data())
            .flatten()
            .filter(|j| j.status.is_active())
            .count()
    }
}

pub struct SubjectDetailViewModel {
    api: ApiClient,
    subject_id: String,
    state: StateHandle<SubjectDetailState>,
    uploads: UploadQueue,
}

impl SubjectDetailViewModel {
    pub fn new(api: ApiClient, subject_id: impl Into<String>) -> Self {
        let subject_id = subject_id.into();
        Self {
            uploads: UploadQueue::new(api.clone(), subject_id.clone()),
            api,
            subject_id,
            state: StateHandle::default(),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn state(&self) -> &StateHandle<SubjectDetailState> {
        &self.state
    }

    pub fn snapshot(&self) -> SubjectDetailState {
        self.state.snapshot()
    }

    pub fn uploads(&self) -> &UploadQueue {
        &self.uploads
    }

    /// Subject, PDFs and jobs. Returns the first failure after all four
    /// loads have settled.
    pub async fn load(&self, force: bool) -> AppResult<()> {
        let (subject, pdfs, jobs) = tokio::join!(
            run_load(
                &self.state,
                |s: &mut SubjectDetailState| &mut s.subject,
                force,
                "subject",
                self.api.get_subject(&self.subject_id),
            ),
            self.load_pdfs(force),
            self.load_jobs(force),
        );
        subject?;
        pdfs?;
        jobs
    }

    pub async fn load_pdfs(&self, force: bool) -> AppResult<LoadOutcome> {
        run_load(
            &self.state,
            |s: &mut SubjectDetailState| &mut s.pdfs,
            force,
            "pdfs",
            self.api.list_pdfs(&self.subject_id),
        )
        .await
    }

    pub async fn load_jobs(&self, force: bool) -> AppResult<()> {
        let (exam_jobs, grading_jobs) = tokio::join!(
            run_load(
                &self.state,
                |s: &mut SubjectDetailState| &mut s.exam_jobs,
                force,
                "exam jobs",
                self.api.list_exam_jobs(&self.subject_id),
            ),
            run_load(
                &self.state,
                |s: &mut SubjectDetailState| &mut s.grading_jobs,
                force,
                "grading jobs",
                self.api.list_grading_jobs(&self.subject_id),
            ),
        );
        exam_jobs?;
        grading_jobs?;
        Ok(())
    }

    /// Delete a PDF, then reload the list whether or not the delete
    /// succeeded.
    pub async fn delete_pdf(&self, pdf_id: &str) -> AppResult<()> {
        let result = self.api.delete_pdf(&self.subject_id, pdf_id).await;
        let reload = self.load_pdfs(true).await;
        match result {
            Ok(()) => {
                info!("Deleted PDF {}", pdf_id);
                self.state.update(|s| s.notice = Some("PDF deleted".to_string()));
                reload.map(|_| ())
            }
            Err(err) => {
                let message = err.user_message();
                self.state.update(|s| s.notice = Some(message));
                Err(err)
            }
        }
    }

    /// Signed download URL for a PDF of this subject.
    pub async fn download_url(&self, pdf_id: &str) -> AppResult<String> {
        Ok(self.api.pdf_download_url(&self.subject_id, pdf_id).await?.url)
    }

    /// Upload files in order, then reload the PDF list once the batch has
    /// run, whether it completed, stopped part way or failed on the first
    /// file. A batch rejected before any request leaves the list alone.
    pub async fn upload(&self, files: Vec<UploadFile>) -> AppResult<UploadReport> {
        let report = self.uploads.run(files).await?;
        let notice = match &report.failure {
            None => format!("Uploaded {} file(s)", report.uploaded.len()),
            Some((_, err)) => format!(
                "Uploaded {} of {} file(s): {}",
                report.uploaded.len(),
                report.total,
                err.user_message()
            ),
        };
        self.state.update(|s| s.notice = Some(notice));
        self.load_pdfs(true).await?;
        Ok(report)
    }

    /// Cancel an active job of this subject, then reload the job lists.
    pub async fn cancel_job(&self, kind: JobKind, job_id: &str) -> AppResult<()> {
        let known = self.state.read(|s| {
            let list = match kind {
                JobKind::Grading => &s.grading_jobs,
                _ => &s.exam_jobs,
            };
            list.data()
                .and_then(|jobs| jobs.iter().find(|j| j.id == job_id))
                .map(|j| j.status)
        });
        if known.map_or(false, |status| status.is_terminal()) {
            return Err(StateError::JobFinished.into());
        }
        self.api.cancel_job(&self.subject_id, kind, job_id).await?;
        info!("Cancelled job {}", job_id);
        self.load_jobs(true).await
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }

    pub fn dispose(&self) {
        self.state.dispose();
        self.uploads.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockResponse;
    use crate::state::testing::Fixture;
    use serde_json::json;

    fn fixture() -> Fixture {
        let fx = Fixture::new();
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1"),
            MockResponse::json(200, &json!({"id": "s1", "name": "Physics"})),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/pdfs"),
            MockResponse::json(200, &json!([{"id": "p1", "filename": "a.pdf"}])),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/exam-jobs"),
            MockResponse::json(
                200,
                &json!({"jobs": [{"id": "j1", "status": "processing", "progress": 20,
                                  "created_at": "2024-01-01T00:00:00Z"}]}),
            ),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/grading-jobs"),
            MockResponse::json(
                200,
                &json!({"jobs": [{"id": "g1", "status": "completed",
                                  "created_at": "2024-01-02T00:00:00Z"}]}),
            ),
        );
        fx
    }

    #[tokio::test]
    async fn test_load_everything() {
        let fx = fixture();
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");
        vm.load(false).await.unwrap();

        let state = vm.snapshot();
        assert_eq!(state.subject.data().map(|s| s.name.as_str()), Some("Physics"));
        assert_eq!(state.pdfs.data().map(Vec::len), Some(1));
        assert_eq!(state.active_job_count(), 1);

        let views = state.job_views();
        assert_eq!(views[0].id, "g1");
        assert_eq!(views[0].kind_label, "Grading");
        assert_eq!(views[1].kind_label, "Exam generation");
    }

    #[tokio::test]
    async fn test_delete_pdf_reloads_even_on_failure() {
        let fx = fixture();
        fx.http.set_method_response(
            "DELETE",
            &fx.url("/api/subjects/s1/pdfs/p1"),
            MockResponse::status(404),
        );
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");

        let err = vm.delete_pdf("p1").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fx.http.count("GET", &fx.url("/api/subjects/s1/pdfs")), 1);
        assert!(vm.snapshot().notice.is_some());
    }

    #[tokio::test]
    async fn test_partial_upload_reloads_pdfs() {
        let fx = fixture();
        let url = fx.url("/api/subjects/s1/pdfs");
        fx.http.push_response(
            "POST",
            &url,
            MockResponse::json(201, &json!({"id": "p2", "filename": "b.pdf"})),
        );
        fx.http.push_response("POST", &url, MockResponse::status(413));
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");

        let report = vm
            .upload(vec![
                UploadFile::memory("b.pdf", &b"b"[..]),
                UploadFile::memory("c.pdf", &b"c"[..]),
            ])
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(fx.http.count("GET", &url), 1);
        assert!(vm
            .snapshot()
            .notice
            .unwrap()
            .starts_with("Uploaded 1 of 2 file(s)"));
    }

    #[tokio::test]
    async fn test_failed_first_file_still_reloads_pdfs() {
        let fx = fixture();
        let url = fx.url("/api/subjects/s1/pdfs");
        fx.http.push_response("POST", &url, MockResponse::status(500));
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");

        let report = vm
            .upload(vec![
                UploadFile::memory("b.pdf", &b"b"[..]),
                UploadFile::memory("c.pdf", &b"c"[..]),
            ])
            .await
            .unwrap();

        assert!(report.uploaded.is_empty());
        assert_eq!(fx.http.count("POST", &url), 1);
        assert_eq!(fx.http.count("GET", &url), 1);
        assert_eq!(vm.snapshot().pdfs.data().map(Vec::len), Some(1));
        assert!(vm
            .snapshot()
            .notice
            .unwrap()
            .starts_with("Uploaded 0 of 2 file(s)"));
    }

    #[tokio::test]
    async fn test_rejected_batch_does_not_reload() {
        let fx = fixture();
        let url = fx.url("/api/subjects/s1/pdfs");
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");

        let err = vm
            .upload(vec![UploadFile::memory("notes.txt", &b"x"[..])])
            .await
            .unwrap_err();

        assert_eq!(err.category(), crate::error::ErrorCategory::Validation);
        assert_eq!(fx.http.count("POST", &url), 0);
        assert_eq!(fx.http.count("GET", &url), 0);
        assert!(vm.snapshot().notice.is_none());
    }

    #[tokio::test]
    async fn test_download_url() {
        let fx = fixture();
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/pdfs/p1/download-url"),
            MockResponse::json(200, &json!({"url": "https://files.example.com/a.pdf"})),
        );
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");
        assert_eq!(
            vm.download_url("p1").await.unwrap(),
            "https://files.example.com/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_cancel_finished_job_rejected() {
        let fx = fixture();
        let vm = SubjectDetailViewModel::new(fx.api.clone(), "s1");
        vm.load_jobs(false).await.unwrap();

        let err = vm.cancel_job(JobKind::Grading, "g1").await.unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::State);
        assert!(fx
            .http
            .requests_to("POST", &fx.url("/api/subjects/s1/grading-jobs"))
            .is_empty());
    }
}
