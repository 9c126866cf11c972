use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::Job;
use super::submission::SubmissionSummary;
use super::{deserialize_id, deserialize_nullable_string, deserialize_optional_id, deserialize_timestamp};

/// Requested difficulty of a generated exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy", alias = "EASY")]
    Easy,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Hard", alias = "HARD")]
    Hard,
    #[serde(alias = "Mixed", alias = "MIXED")]
    Mixed,
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    /// All values offered in the generation form.
    pub const SELECTABLE: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Mixed => "Mixed",
            Difficulty::Unknown => "Unknown",
        }
    }
}

/// Backend-driven lifecycle status of an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    /// Created but no generation job has produced questions
    #[default]
    Draft,
    /// Generation job queued
    #[serde(alias = "queued")]
    Pending,
    /// Generation job running
    #[serde(alias = "generating", alias = "in_progress")]
    Processing,
    /// Questions are available
    #[serde(alias = "ready", alias = "generated")]
    Completed,
    Failed,
    Archived,
    #[serde(other)]
    Unknown,
}

impl ExamStatus {
    /// The exam is still being produced by a generation job.
    pub fn is_generating(&self) -> bool {
        matches!(self, ExamStatus::Pending | ExamStatus::Processing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamStatus::Draft => "Draft",
            ExamStatus::Pending => "Queued",
            ExamStatus::Processing => "Generating",
            ExamStatus::Completed => "Ready",
            ExamStatus::Failed => "Failed",
            ExamStatus::Archived => "Archived",
            ExamStatus::Unknown => "Unknown",
        }
    }
}

/// Kind of question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[serde(alias = "mcq", alias = "multiple-choice")]
    MultipleChoice,
    #[serde(alias = "true-false", alias = "boolean")]
    TrueFalse,
    #[default]
    #[serde(alias = "short")]
    ShortAnswer,
    #[serde(alias = "long_answer")]
    Essay,
    #[serde(other)]
    Unknown,
}

impl QuestionType {
    /// Whether the question is answered by picking one of its options.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

/// One question of an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamQuestion {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(
        default,
        alias = "question",
        alias = "question_text",
        deserialize_with = "deserialize_nullable_string"
    )]
    pub prompt: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub model_answer: Option<String>,
    #[serde(default)]
    pub rubric: Option<String>,
    #[serde(default, rename = "type", alias = "question_type")]
    pub question_type: QuestionType,
    #[serde(default = "default_points", alias = "max_points")]
    pub points: f64,
}

fn default_points() -> f64 {
    1.0
}

impl ExamQuestion {
    /// Options to render; true/false questions without explicit options get
    /// the two canonical ones.
    pub fn display_options(&self) -> Vec<String> {
        match (&self.options, self.question_type) {
            (Some(options), _) if !options.is_empty() => options.clone(),
            (_, QuestionType::TrueFalse) => vec!["True".to_string(), "False".to_string()],
            _ => Vec::new(),
        }
    }
}

/// An exam, either as a list row or with its questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub subject_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub title: String,
    #[serde(default, alias = "num_questions")]
    pub question_count: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub ai_provider: Option<String>,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: ExamStatus,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<ExamQuestion>,
    /// Ids of the PDFs the exam was generated from
    #[serde(default)]
    pub pdf_ids: Vec<String>,
    /// Most recent submission of the current user, if any
    #[serde(default, alias = "latest_submission")]
    pub submission: Option<SubmissionSummary>,
    /// Latest generation or grading job for this exam, if the backend embeds it
    #[serde(default, alias = "job", alias = "current_job")]
    pub latest_job: Option<Job>,
}

impl Exam {
    /// Total points available; falls back to the question count when the
    /// questions are not loaded.
    pub fn total_points(&self) -> f64 {
        if self.questions.is_empty() {
            self.question_count as f64
        } else {
            self.questions.iter().map(|q| q.points).sum()
        }
    }
}

/// Body of `POST /api/subjects/{id}/exams/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateExamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub ai_provider: String,
    pub ai_model: String,
    pub language: String,
    pub pdf_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub question_types: Vec<QuestionType>,
}

/// Response of the generate endpoint: the job that will produce the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateExamResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub job_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub exam_id: Option<String>,
    #[serde(default)]
    pub status: super::JobStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// One answer in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub question_id: String,
    pub answer: String,
}

/// Body of `POST /api/subjects/{id}/exams/{exam_id}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitExamRequest {
    pub answers: Vec<AnswerPayload>,
}

/// Response of the submit endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitExamResponse {
    #[serde(deserialize_with = "deserialize_id", alias = "id")]
    pub submission_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub grading_job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
