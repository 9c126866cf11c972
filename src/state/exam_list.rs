//! Exam list of one subject.

use tracing::info;

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::error::AppResult;
use crate::view_state::{summarize, ExamSummaryView};

#[derive(Debug, Clone, Default)]
pub struct ExamListState {
    /// Rows as displayed; rebuilt from every applied response
    pub exams: Resource<Vec<ExamSummaryView>>,
    /// Exam currently being deleted
    pub deleting: Option<String>,
    pub notice: Option<String>,
}

impl ExamListState {
    pub fn rows(&self) -> &[ExamSummaryView] {
        self.exams.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_loaded() && self.rows().is_empty()
    }
}

pub struct ExamListViewModel {
    api: ApiClient,
    subject_id: String,
    state: StateHandle<ExamListState>,
}

impl ExamListViewModel {
    pub fn new(api: ApiClient, subject_id: impl Into<String>) -> Self {
        Self {
            api,
            subject_id: subject_id.into(),
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<ExamListState> {
        &self.state
    }

    pub fn snapshot(&self) -> ExamListState {
        self.state.snapshot()
    }

    /// Fetch the exams together with the subject's generation and grading
    /// jobs, so an exam with a running job is never offered for taking.
    /// Without `force` this is a no-op while a fetch is in flight; with
    /// `force` the in-flight response is discarded in favour of the new one.
    pub async fn load_exams(&self, force: bool) -> AppResult<LoadOutcome> {
        let fetch = async {
            let (exams, exam_jobs, grading_jobs) = tokio::join!(
                self.api.list_exams(&self.subject_id),
                self.api.list_exam_jobs(&self.subject_id),
                self.api.list_grading_jobs(&self.subject_id),
            );
            let mut jobs = exam_jobs?;
            jobs.extend(grading_jobs?);
            Ok(summarize(&exams?, &jobs))
        };
        run_load(
            &self.state,
            |s: &mut ExamListState| &mut s.exams,
            force,
            "exams",
            fetch,
        )
        .await
    }

    /// Delete an exam. The list is reloaded exactly once afterwards, on
    /// success and on failure alike.
    pub async fn delete_exam(&self, exam_id: &str) -> AppResult<()> {
        self.state.update(|s| s.deleting = Some(exam_id.to_string()));
        let result = self.api.delete_exam(&self.subject_id, exam_id).await;
        self.state.update(|s| s.deleting = None);

        let reload = self.load_exams(true).await;
        match result {
            Ok(()) => {
                info!("Deleted exam {}", exam_id);
                self.state.update(|s| s.notice = Some("Exam deleted".to_string()));
                reload.map(|_| ())
            }
            Err(err) => {
                let message = err.user_message();
                self.state.update(|s| s.notice = Some(message));
                Err(err)
            }
        }
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockResponse;
    use crate::state::resource::Phase;
    use crate::state::testing::Fixture;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn no_jobs(fx: &Fixture) {
        for path in ["/api/subjects/s1/exam-jobs", "/api/subjects/s1/grading-jobs"] {
            fx.http
                .set_method_response("GET", &fx.url(path), MockResponse::json(200, &json!([])));
        }
    }

    fn list(titles: &[&str]) -> MockResponse {
        let exams: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"id": format!("e{}", i), "title": t, "status": "completed"}))
            .collect();
        MockResponse::json(200, &json!({"exams": exams}))
    }

    #[tokio::test]
    async fn test_load_builds_rows() {
        let fx = Fixture::new();
        no_jobs(&fx);
        fx.http
            .set_method_response("GET", &fx.url("/api/subjects/s1/exams"), list(&["Midterm"]));
        let vm = ExamListViewModel::new(fx.api.clone(), "s1");

        assert_eq!(vm.load_exams(false).await.unwrap(), LoadOutcome::Loaded);
        let state = vm.snapshot();
        assert_eq!(state.rows()[0].title, "Midterm");
        assert!(state.rows()[0].can_take);
    }

    #[tokio::test]
    async fn test_delete_reloads_once() {
        let fx = Fixture::new();
        no_jobs(&fx);
        let exams_url = fx.url("/api/subjects/s1/exams");
        fx.http.set_method_response("GET", &exams_url, list(&[]));
        fx.http.set_method_response(
            "DELETE",
            &fx.url("/api/subjects/s1/exams/e0"),
            MockResponse::status(204),
        );
        let vm = ExamListViewModel::new(fx.api.clone(), "s1");

        vm.delete_exam("e0").await.unwrap();
        assert_eq!(fx.http.count("GET", &exams_url), 1);
        assert!(vm.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_still_reloads_once() {
        let fx = Fixture::new();
        no_jobs(&fx);
        let exams_url = fx.url("/api/subjects/s1/exams");
        fx.http.set_method_response("GET", &exams_url, list(&["Kept"]));
        fx.http.set_method_response(
            "DELETE",
            &fx.url("/api/subjects/s1/exams/e0"),
            MockResponse::status(500),
        );
        let vm = ExamListViewModel::new(fx.api.clone(), "s1");

        assert!(vm.delete_exam("e0").await.is_err());
        assert_eq!(fx.http.count("GET", &exams_url), 1);
        let state = vm.snapshot();
        assert_eq!(state.rows().len(), 1);
        assert!(state.notice.is_some());
        assert!(state.deleting.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_load_skipped() {
        let fx = Fixture::new();
        no_jobs(&fx);
        let url = fx.url("/api/subjects/s1/exams");
        fx.http.set_method_response(
            "GET",
            &url,
            list(&["Slow"]).delayed(Duration::from_millis(100)),
        );
        let vm = Arc::new(ExamListViewModel::new(fx.api.clone(), "s1"));

        let first = tokio::spawn({
            let vm = vm.clone();
            async move { vm.load_exams(false).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(vm.load_exams(false).await.unwrap(), LoadOutcome::Skipped);

        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Loaded);
        assert_eq!(fx.http.count("GET", &url), 1);
    }

    #[tokio::test]
    async fn test_forced_refresh_wins_over_stale_response() {
        let fx = Fixture::new();
        no_jobs(&fx);
        let url = fx.url("/api/subjects/s1/exams");
        fx.http.push_response(
            "GET",
            &url,
            list(&["Stale"]).delayed(Duration::from_millis(150)),
        );
        fx.http.push_response("GET", &url, list(&["Fresh A", "Fresh B"]));
        let vm = Arc::new(ExamListViewModel::new(fx.api.clone(), "s1"));

        let first = tokio::spawn({
            let vm = vm.clone();
            async move { vm.load_exams(false).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(vm.load_exams(true).await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Superseded);

        let state = vm.snapshot();
        assert_eq!(state.exams.phase, Phase::Loaded);
        assert!(state.exams.error.is_none());
        let titles: Vec<&str> = state.rows().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh A", "Fresh B"]);
        assert_eq!(fx.http.count("GET", &url), 2);
    }

    #[tokio::test]
    async fn test_disposed_list_ignores_late_response() {
        let fx = Fixture::new();
        no_jobs(&fx);
        let url = fx.url("/api/subjects/s1/exams");
        fx.http.set_method_response(
            "GET",
            &url,
            list(&["Late"]).delayed(Duration::from_millis(50)),
        );
        let vm = Arc::new(ExamListViewModel::new(fx.api.clone(), "s1"));

        let load = tokio::spawn({
            let vm = vm.clone();
            async move { vm.load_exams(false).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        vm.dispose();

        assert_eq!(load.await.unwrap().unwrap(), LoadOutcome::Disposed);
        assert!(vm.snapshot().rows().is_empty());
    }

    #[tokio::test]
    async fn test_running_grading_job_blocks_taking() {
        let fx = Fixture::new();
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/exams"),
            MockResponse::json(200, &json!([{"id": "e1", "status": "completed"}])),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/exam-jobs"),
            MockResponse::json(200, &json!([])),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/grading-jobs"),
            MockResponse::json(
                200,
                &json!([{"id": "g1", "exam_id": "e1", "status": "processing", "progress": 20}]),
            ),
        );
        let vm = ExamListViewModel::new(fx.api.clone(), "s1");

        vm.load_exams(false).await.unwrap();

        let state = vm.snapshot();
        let row = &state.rows()[0];
        assert!(!row.can_take);
        assert!(row.show_progress);
        assert_eq!(row.progress, 20);
        assert_eq!(row.status_label, "Grading");
        assert_eq!(fx.http.count("GET", &fx.url("/api/subjects/s1/grading-jobs")), 1);
        assert_eq!(fx.http.count("GET", &fx.url("/api/subjects/s1/exam-jobs")), 1);
    }

    #[tokio::test]
    async fn test_failed_job_fetch_fails_the_load() {
        let fx = Fixture::new();
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/exams"),
            list(&["Midterm"]),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/exam-jobs"),
            MockResponse::json(200, &json!([])),
        );
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/subjects/s1/grading-jobs"),
            MockResponse::status(500),
        );
        let vm = ExamListViewModel::new(fx.api.clone(), "s1");

        assert!(vm.load_exams(false).await.is_err());
        let state = vm.snapshot();
        assert!(state.exams.is_blocking_error());
        assert!(state.rows().is_empty());
    }
}
