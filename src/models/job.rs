use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{deserialize_id, deserialize_optional_id, deserialize_timestamp};

/// Server-owned state of an asynchronous job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    #[serde(alias = "queued")]
    Pending,
    #[serde(alias = "running", alias = "in_progress")]
    Processing,
    #[serde(alias = "done", alias = "succeeded")]
    Completed,
    #[serde(alias = "error")]
    Failed,
    #[serde(alias = "canceled")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// No further transitions will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Job is queued or running. `Unknown` counts as neither.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Processing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Queued",
            JobStatus::Processing => "Processing",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::Cancelled => "Cancelled",
            JobStatus::Unknown => "Unknown",
        }
    }
}

/// Which pipeline a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    #[default]
    #[serde(alias = "exam_generation", alias = "generate")]
    Generation,
    #[serde(alias = "exam_grading", alias = "grade")]
    Grading,
    #[serde(other)]
    Unknown,
}

impl JobKind {
    /// Path segment under `/api/subjects/{id}/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            JobKind::Grading => "grading-jobs",
            JobKind::Generation | JobKind::Unknown => "exam-jobs",
        }
    }
}

/// An exam-generation or grading job. The client only displays the latest
/// snapshot the backend reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "deserialize_id", alias = "job_id")]
    pub id: String,
    #[serde(default, alias = "job_type", alias = "type")]
    pub kind: JobKind,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub subject_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub exam_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    /// Percentage reported by the backend, clamped to 0–100
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "error")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp", alias = "canceled_at")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Snapshot built from an acknowledgement that only carried an id.
    pub fn new(id: impl Into<String>, kind: JobKind, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            kind,
            subject_id: None,
            exam_id: None,
            submission_id: None,
            status,
            progress: 0,
            message: None,
            error_message: None,
            created_at: None,
            started_at: None,
            completed_at: None,
            failed_at: None,
            cancelled_at: None,
        }
    }

    /// Timestamp of the transition into the current status, if reported.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            JobStatus::Completed => self.completed_at,
            JobStatus::Failed => self.failed_at,
            JobStatus::Cancelled => self.cancelled_at,
            _ => None,
        }
    }
}

/// Accepts integers, floats or numeric strings; clamps into 0–100.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let raw = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(clamp_progress(raw))
}

pub(crate) fn clamp_progress(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
