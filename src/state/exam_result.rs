//! Result of a submitted exam.

use tracing::{debug, info};

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::JobStatus;
use crate::view_state::{JobView, ResultView};

#[derive(Debug, Clone, Default)]
pub struct ExamResultState {
    pub result: Resource<ResultView>,
}

impl ExamResultState {
    pub fn is_pending(&self) -> bool {
        self.result.data().map_or(false, |r| !r.graded)
    }
}

pub struct ExamResultViewModel {
    api: ApiClient,
    subject_id: String,
    exam_id: String,
    state: StateHandle<ExamResultState>,
}

impl ExamResultViewModel {
    pub fn new(api: ApiClient, subject_id: impl Into<String>, exam_id: impl Into<String>) -> Self {
        Self {
            api,
            subject_id: subject_id.into(),
            exam_id: exam_id.into(),
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<ExamResultState> {
        &self.state
    }

    pub fn snapshot(&self) -> ExamResultState {
        self.state.snapshot()
    }

    pub async fn load(&self, force: bool) -> AppResult<LoadOutcome> {
        let fetch = async {
            let result = self.api.get_exam_result(&self.subject_id, &self.exam_id).await?;
            Ok(ResultView::new(&result))
        };
        run_load(
            &self.state,
            |s: &mut ExamResultState| &mut s.result,
            force,
            "exam result",
            fetch,
        )
        .await
    }

    /// While grading is pending, fetch the grading job; reloads the result
    /// once the job has completed. Returns the refreshed job view, or `None`
    /// when nothing is pending.
    pub async fn refresh_grading(&self) -> AppResult<Option<JobView>> {
        let job_id = self.state.read(|s| {
            s.result
                .data()
                .filter(|r| !r.graded)
                .and_then(|r| r.grading_job.as_ref())
                .map(|j| j.id.clone())
        });
        let Some(job_id) = job_id else {
            debug!("No pending grading job for exam {}", self.exam_id);
            return Ok(None);
        };

        let job = self.api.get_grading_job(&self.subject_id, &job_id).await?;
        let view = JobView::new(&job);
        self.state.update(|s| {
            if let Some(result) = s.result.data.as_mut() {
                result.grading_job = Some(view.clone());
            }
        });
        if job.status == JobStatus::Completed {
            info!("Grading job {} completed, reloading result", job.id);
            self.load(true).await?;
        }
        Ok(Some(view))
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
