//! Exam generation form and the job it starts.

use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::{AppResult, StateError, ValidationError};
use crate::models::{Difficulty, GenerateExamRequest, Job, JobKind, JobStatus, PdfDocument, QuestionType};
use crate::view_state::JobView;

pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 50;
pub const DEFAULT_QUESTIONS: u32 = 10;
pub const MAX_TITLE_LEN: usize = 100;

/// AI backends the generation endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiProvider {
    #[default]
    OpenAi,
    Google,
}

impl AiProvider {
    pub const ALL: [AiProvider; 2] = [AiProvider::OpenAi, AiProvider::Google];

    /// Wire value of `ai_provider`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Google => "google",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OpenAI",
            AiProvider::Google => "Google Gemini",
        }
    }

    /// Models offered for this provider; the first is the default.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            AiProvider::OpenAi => &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"],
            AiProvider::Google => &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-flash"],
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }

    pub fn supports(&self, model: &str) -> bool {
        self.models().contains(&model)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationForm {
    pub title: String,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub provider: AiProvider,
    pub model: String,
    pub language: String,
    pub selected_pdfs: BTreeSet<String>,
    pub question_types: Vec<QuestionType>,
}

impl Default for GenerationForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            question_count: DEFAULT_QUESTIONS,
            difficulty: Difficulty::default(),
            provider: AiProvider::default(),
            model: AiProvider::default().default_model().to_string(),
            language: "en".to_string(),
            selected_pdfs: BTreeSet::new(),
            question_types: Vec::new(),
        }
    }
}

impl GenerationForm {
    /// Check the form and build the request body. Nothing is sent when this
    /// fails.
    pub fn validate(&self) -> Result<GenerateExamRequest, ValidationError> {
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(ValidationError::OutOfRange {
                field: "Question count",
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }
        let title = self.title.trim();
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "Title",
                max: MAX_TITLE_LEN,
            });
        }
        if !self.provider.supports(&self.model) {
            return Err(ValidationError::UnsupportedModel {
                provider: self.provider.as_str().to_string(),
                model: self.model.clone(),
            });
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::Required { field: "Language" });
        }
        if self.selected_pdfs.is_empty() {
            return Err(ValidationError::NoPdfSelected);
        }

        Ok(GenerateExamRequest {
            title: Some(title.to_string()).filter(|t| !t.is_empty()),
            question_count: self.question_count,
            difficulty: self.difficulty,
            ai_provider: self.provider.as_str().to_string(),
            ai_model: self.model.clone(),
            language: self.language.trim().to_string(),
            pdf_ids: self.selected_pdfs.iter().cloned().collect(),
            question_types: self.question_types.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExamGenerationState {
    pub form: GenerationForm,
    /// PDFs of the subject available as source material
    pub pdfs: Resource<Vec<PdfDocument>>,
    pub submitting: bool,
    /// Latest snapshot of the job started by `generate`
    pub job: Option<Job>,
    pub exam_id: Option<String>,
    pub polling: bool,
    /// Inline form or request error
    pub error: Option<String>,
}

impl ExamGenerationState {
    pub fn job_view(&self) -> Option<JobView> {
        self.job.as_ref().map(JobView::new)
    }
}

pub struct ExamGenerationViewModel {
    api: ApiClient,
    subject_id: String,
    poll_interval: Duration,
    state: StateHandle<ExamGenerationState>,
}

impl ExamGenerationViewModel {
    pub fn new(api: ApiClient, subject_id: impl Into<String>) -> Self {
        Self {
            api,
            subject_id: subject_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: StateHandle::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> &StateHandle<ExamGenerationState> {
        &self.state
    }

    pub fn snapshot(&self) -> ExamGenerationState {
        self.state.snapshot()
    }

    /// Load the subject's PDFs for the source picker.
    pub async fn load(&self, force: bool) -> AppResult<LoadOutcome> {
        run_load(
            &self.state,
            |s: &mut ExamGenerationState| &mut s.pdfs,
            force,
            "pdfs",
            self.api.list_pdfs(&self.subject_id),
        )
        .await
    }

    fn edit(&self, f: impl FnOnce(&mut GenerationForm)) {
        self.state.update(|s| {
            f(&mut s.form);
            s.error = None;
        });
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.edit(|f| f.title = title);
    }

    pub fn set_question_count(&self, count: u32) {
        self.edit(|f| f.question_count = count);
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.edit(|f| f.difficulty = difficulty);
    }

    /// Switch provider; the model falls back to the provider's default when
    /// the current one is not offered there.
    pub fn set_provider(&self, provider: AiProvider) {
        self.edit(|f| {
            f.provider = provider;
            if !provider.supports(&f.model) {
                f.model = provider.default_model().to_string();
            }
        });
    }

    pub fn set_model(&self, model: impl Into<String>) {
        let model = model.into();
        self.edit(|f| f.model = model);
    }

    pub fn set_language(&self, code: impl Into<String>) {
        let code = code.into();
        self.edit(|f| f.language = code);
    }

    pub fn set_question_types(&self, types: Vec<QuestionType>) {
        self.edit(|f| f.question_types = types);
    }

    /// Toggle a PDF in the selection. Ids not in the loaded list are
    /// ignored; returns whether the PDF is now selected.
    pub fn toggle_pdf(&self, pdf_id: &str) -> bool {
        self.state
            .update(|s| {
                let known = s
                    .pdfs
                    .data()
                    .map_or(false, |pdfs| pdfs.iter().any(|p| p.id == pdf_id));
                if !known {
                    return false;
                }
                s.error = None;
                if s.form.selected_pdfs.remove(pdf_id) {
                    false
                } else {
                    s.form.selected_pdfs.insert(pdf_id.to_string());
                    true
                }
            })
            .unwrap_or(false)
    }

    pub fn select_all_pdfs(&self) {
        self.state.update(|s| {
            let ids: Vec<String> = s
                .pdfs
                .data()
                .map(|pdfs| pdfs.iter().map(|p| p.id.clone()).collect())
                .unwrap_or_default();
            s.form.selected_pdfs.extend(ids);
            s.error = None;
        });
    }

    /// Validate the form and start a generation job.
    pub async fn generate(&self) -> AppResult<Job> {
        let form = self.state.read(|s| s.form.clone());
        let request = match form.validate() {
            Ok(request) => request,
            Err(err) => {
                let message = err.user_message();
                self.state.update(|s| s.error = Some(message));
                return Err(err.into());
            }
        };

        let started = self
            .state
            .update(|s| {
                if s.submitting {
                    return false;
                }
                s.submitting = true;
                s.error = None;
                true
            })
            .ok_or(StateError::Disposed)?;
        if !started {
            return Err(StateError::SubmitInProgress.into());
        }

        info!(
            "Generating {} question(s) with {}/{} from {} PDF(s)",
            request.question_count,
            request.ai_provider,
            request.ai_model,
            request.pdf_ids.len()
        );
        match self.api.generate_exam(&self.subject_id, &request).await {
            Ok(response) => {
                let mut job = Job::new(response.job_id, JobKind::Generation, response.status);
                job.subject_id = Some(self.subject_id.clone());
                job.exam_id = response.exam_id.clone();
                job.message = response.message;
                self.state.update(|s| {
                    s.submitting = false;
                    s.exam_id = response.exam_id;
                    s.job = Some(job.clone());
                });
                Ok(job)
            }
            Err(err) => {
                warn!("Exam generation request failed: {}", err);
                let message = err.user_message();
                self.state.update(|s| {
                    s.submitting = false;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }

    fn current_job_id(&self) -> AppResult<String> {
        self.state
            .read(|s| s.job.as_ref().map(|j| j.id.clone()))
            .ok_or_else(|| StateError::NoActiveJob.into())
    }

    /// Fetch the latest snapshot of the started job.
    pub async fn refresh_job(&self) -> AppResult<Job> {
        let job_id = self.current_job_id()?;
        let job = self.api.get_exam_job(&self.subject_id, &job_id).await?;
        debug!("Job {} is {} ({}%)", job.id, job.status.label(), job.progress);
        self.state
            .update(|s| {
                if job.exam_id.is_some() {
                    s.exam_id = job.exam_id.clone();
                }
                s.job = Some(job.clone());
            })
            .ok_or(StateError::Disposed)?;
        Ok(job)
    }

    pub async fn cancel_job(&self) -> AppResult<Job> {
        let job_id = self.current_job_id()?;
        if self.state.read(|s| s.job.as_ref().map_or(false, |j| j.status.is_terminal())) {
            return Err(StateError::JobFinished.into());
        }
        match self.api.cancel_exam_job(&self.subject_id, &job_id).await? {
            Some(job) => {
                info!("Cancelled job {}", job.id);
                self.state.update(|s| s.job = Some(job.clone()));
                Ok(job)
            }
            None => self.refresh_job().await,
        }
    }

    /// Poll the job at a fixed interval until it reaches a terminal status.
    /// Stops at the first failed poll, and when the screen is disposed.
    pub async fn watch_job(&self) -> AppResult<Job> {
        self.current_job_id()?;
        self.state.update(|s| s.polling = true);
        let result = self.poll_until_done().await;
        self.state.update(|s| s.polling = false);
        result
    }

    async fn poll_until_done(&self) -> AppResult<Job> {
        loop {
            let job = self.refresh_job().await?;
            if job.status.is_terminal() {
                if job.status == JobStatus::Failed {
                    warn!("Generation job {} failed: {:?}", job.id, job.error_message);
                } else {
                    info!("Generation job {} finished: {}", job.id, job.status.label());
                }
                return Ok(job);
            }
            tokio::time::sleep(self.poll_interval).await;
            if self.state.is_disposed() {
                debug!("Stopping job poll for disposed screen");
                return Err(StateError::Disposed.into());
            }
        }
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
