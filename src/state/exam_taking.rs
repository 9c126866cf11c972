//! Taking an exam: answers, navigation and submission.

use std::collections::HashMap;
use tracing::{info, warn};

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::error::{AppResult, StateError};
use crate::models::{AnswerPayload, Exam, ExamQuestion, SubmitExamRequest, SubmitExamResponse};

/// Submission lifecycle. `Submitted` is terminal for the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Editing,
    Submitting,
    Submitted {
        submission_id: String,
        grading_job_id: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ExamTakingState {
    pub exam: Resource<Exam>,
    /// Answers keyed by question id
    pub answers: HashMap<String, String>,
    /// Index of the question on screen
    pub current: usize,
    pub phase: SubmitPhase,
    pub error: Option<String>,
}

impl ExamTakingState {
    pub fn questions(&self) -> &[ExamQuestion] {
        self.exam.data().map(|e| e.questions.as_slice()).unwrap_or_default()
    }

    pub fn current_question(&self) -> Option<&ExamQuestion> {
        self.questions().get(self.current)
    }

    pub fn answer(&self, question_id: &str) -> &str {
        self.answers.get(question_id).map(String::as_str).unwrap_or("")
    }

    /// Questions with a non-blank answer.
    pub fn answered_count(&self) -> usize {
        self.questions()
            .iter()
            .filter(|q| !self.answer(&q.id).trim().is_empty())
            .count()
    }

    pub fn can_edit(&self) -> bool {
        self.phase == SubmitPhase::Editing
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions().len()
    }
}

/// One entry per question, in question order; unanswered questions are sent
/// as the empty string.
pub fn build_submission(exam: &Exam, answers: &HashMap<String, String>) -> SubmitExamRequest {
    SubmitExamRequest {
        answers: exam
            .questions
            .iter()
            .map(|q| AnswerPayload {
                question_id: q.id.clone(),
                answer: answers.get(&q.id).cloned().unwrap_or_default(),
            })
            .collect(),
    }
}

pub struct ExamTakingViewModel {
    api: ApiClient,
    subject_id: String,
    exam_id: String,
    state: StateHandle<ExamTakingState>,
}

impl ExamTakingViewModel {
    pub fn new(api: ApiClient, subject_id: impl Into<String>, exam_id: impl Into<String>) -> Self {
        Self {
            api,
            subject_id: subject_id.into(),
            exam_id: exam_id.into(),
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<ExamTakingState> {
        &self.state
    }

    pub fn snapshot(&self) -> ExamTakingState {
        self.state.snapshot()
    }

    pub async fn load(&self, force: bool) -> AppResult<LoadOutcome> {
        let outcome = run_load(
            &self.state,
            |s: &mut ExamTakingState| &mut s.exam,
            force,
            "exam",
            self.api.get_exam(&self.subject_id, &self.exam_id),
        )
        .await?;
        if outcome == LoadOutcome::Loaded {
            self.state.update(|s| {
                let count = s.questions().len();
                s.current = s.current.min(count.saturating_sub(1));
            });
        }
        Ok(outcome)
    }

    /// Record an answer. Rejected once submission has started.
    pub fn set_answer(&self, question_id: &str, answer: impl Into<String>) -> Result<(), StateError> {
        let answer = answer.into();
        self.state
            .update(|s| {
                match s.phase {
                    SubmitPhase::Editing => {}
                    SubmitPhase::Submitting => return Err(StateError::SubmitInProgress),
                    SubmitPhase::Submitted { .. } => return Err(StateError::AlreadySubmitted),
                }
                if s.exam.data().is_none() {
                    return Err(StateError::NotLoaded { what: "exam" });
                }
                if !s.questions().iter().any(|q| q.id == question_id) {
                    return Err(StateError::UnknownQuestion {
                        question_id: question_id.to_string(),
                    });
                }
                s.answers.insert(question_id.to_string(), answer);
                s.error = None;
                Ok(())
            })
            .unwrap_or(Err(StateError::Disposed))
    }

    /// Jump to a question; out-of-range indices clamp to the last one.
    pub fn go_to(&self, index: usize) {
        self.state.update(|s| {
            let last = s.questions().len().saturating_sub(1);
            s.current = index.min(last);
        });
    }

    pub fn next(&self) {
        let current = self.state.read(|s| s.current);
        self.go_to(current + 1);
    }

    pub fn previous(&self) {
        let current = self.state.read(|s| s.current);
        self.go_to(current.saturating_sub(1));
    }

    /// Submit every question's answer.
    ///
    /// Fails without a request when no questions are loaded, while a submit
    /// is running, or after a successful submit. A failed request returns
    /// the screen to editing with the answers intact.
    pub async fn submit(&self) -> AppResult<SubmitExamResponse> {
        let request = self
            .state
            .update(|s| {
                match s.phase {
                    SubmitPhase::Editing => {}
                    SubmitPhase::Submitting => return Err(StateError::SubmitInProgress),
                    SubmitPhase::Submitted { .. } => return Err(StateError::AlreadySubmitted),
                }
                let exam = match s.exam.data() {
                    Some(exam) if !exam.questions.is_empty() => exam,
                    _ => return Err(StateError::NoQuestionsLoaded),
                };
                let request = build_submission(exam, &s.answers);
                s.phase = SubmitPhase::Submitting;
                s.error = None;
                Ok(request)
            })
            .unwrap_or(Err(StateError::Disposed))?;

        info!(
            "Submitting exam {} ({} answer(s))",
            self.exam_id,
            request.answers.len()
        );
        match self
            .api
            .submit_exam(&self.subject_id, &self.exam_id, &request)
            .await
        {
            Ok(response) => {
                self.state.update(|s| {
                    s.phase = SubmitPhase::Submitted {
                        submission_id: response.submission_id.clone(),
                        grading_job_id: response.grading_job_id.clone(),
                    };
                });
                Ok(response)
            }
            Err(err) => {
                warn!("Submitting exam {} failed: {}", self.exam_id, err);
                let message = err.user_message();
                self.state.update(|s| {
                    s.phase = SubmitPhase::Editing;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockResponse;
    use crate::state::testing::Fixture;
    use serde_json::json;

    const EXAM_URL: &str = "/api/subjects/s1/exams/e1";
    const SUBMIT_URL: &str = "/api/subjects/s1/exams/e1/submit";

    async fn loaded(fx: &Fixture, questions: serde_json::Value) -> ExamTakingViewModel {
        fx.http.set_method_response(
            "GET",
            &fx.url(EXAM_URL),
            MockResponse::json(200, &json!({"exam": {"id": "e1", "status": "completed", "questions": questions}})),
        );
        let vm = ExamTakingViewModel::new(fx.api.clone(), "s1", "e1");
        vm.load(false).await.unwrap();
        vm
    }

    fn three_questions() -> serde_json::Value {
        json!([
            {"id": "q1", "question": "2+2?", "type": "multiple_choice", "options": ["3", "4"]},
            {"id": "q2", "question": "Sky is blue", "type": "true_false"},
            {"id": "q3", "question": "Explain gravity", "type": "essay"}
        ])
    }

    #[tokio::test]
    async fn test_submit_without_questions_sends_nothing() {
        let fx = Fixture::new();
        let vm = loaded(&fx, json!([])).await;

        let err = vm.submit().await.unwrap_err();
        assert_eq!(err.error_code(), StateError::NoQuestionsLoaded.error_code());
        assert!(fx.http.requests_to("POST", &fx.url(SUBMIT_URL)).is_empty());
        assert_eq!(vm.snapshot().phase, SubmitPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_before_load_sends_nothing() {
        let fx = Fixture::new();
        let vm = ExamTakingViewModel::new(fx.api.clone(), "s1", "e1");
        assert!(vm.submit().await.is_err());
        assert!(fx.http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_unanswered_questions_sent_empty() {
        let fx = Fixture::new();
        let vm = loaded(&fx, three_questions()).await;
        fx.http.set_method_response(
            "POST",
            &fx.url(SUBMIT_URL),
            MockResponse::json(200, &json!({"submission_id": "sub1", "grading_job_id": "g1"})),
        );
        vm.set_answer("q1", "4").unwrap();
        vm.set_answer("q3", "Mass attracts mass").unwrap();

        let response = vm.submit().await.unwrap();
        assert_eq!(response.submission_id, "sub1");

        let body = fx.http.requests_to("POST", &fx.url(SUBMIT_URL))[0]
            .json_body()
            .unwrap();
        assert_eq!(
            body,
            json!({"answers": [
                {"question_id": "q1", "answer": "4"},
                {"question_id": "q2", "answer": ""},
                {"question_id": "q3", "answer": "Mass attracts mass"}
            ]})
        );
        assert_eq!(
            vm.snapshot().phase,
            SubmitPhase::Submitted {
                submission_id: "sub1".to_string(),
                grading_job_id: Some("g1".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_submitted_is_terminal() {
        let fx = Fixture::new();
        let vm = loaded(&fx, three_questions()).await;
        fx.http.set_method_response(
            "POST",
            &fx.url(SUBMIT_URL),
            MockResponse::json(200, &json!({"id": "sub1"})),
        );
        vm.submit().await.unwrap();

        assert_eq!(vm.set_answer("q1", "3"), Err(StateError::AlreadySubmitted));
        assert!(vm.submit().await.is_err());
        assert_eq!(fx.http.requests_to("POST", &fx.url(SUBMIT_URL)).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_returns_to_editing() {
        let fx = Fixture::new();
        let vm = loaded(&fx, three_questions()).await;
        fx.http
            .set_method_response("POST", &fx.url(SUBMIT_URL), MockResponse::status(502));
        vm.set_answer("q2", "True").unwrap();

        assert!(vm.submit().await.is_err());
        let state = vm.snapshot();
        assert_eq!(state.phase, SubmitPhase::Editing);
        assert!(state.error.is_some());
        assert_eq!(state.answer("q2"), "True");
        assert!(vm.set_answer("q2", "False").is_ok());
    }

    #[tokio::test]
    async fn test_navigation_and_counts() {
        let fx = Fixture::new();
        let vm = loaded(&fx, three_questions()).await;

        vm.previous();
        assert_eq!(vm.snapshot().current, 0);
        vm.next();
        vm.next();
        vm.next();
        let state = vm.snapshot();
        assert_eq!(state.current, 2);
        assert!(state.is_last());
        assert_eq!(state.current_question().map(|q| q.id.as_str()), Some("q3"));

        vm.set_answer("q1", "  ").unwrap();
        vm.set_answer("q2", "False").unwrap();
        assert_eq!(vm.snapshot().answered_count(), 1);
        assert_eq!(
            vm.set_answer("nope", "x"),
            Err(StateError::UnknownQuestion {
                question_id: "nope".to_string()
            })
        );
    }
}
