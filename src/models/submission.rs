use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::Job;
use super::{deserialize_id, deserialize_nullable_string, deserialize_optional_id, deserialize_timestamp};

/// Grading state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradingStatus {
    /// Submitted, grading not started
    #[default]
    #[serde(alias = "submitted")]
    Pending,
    #[serde(alias = "processing", alias = "in_progress")]
    Grading,
    #[serde(alias = "completed")]
    Graded,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Submission record as embedded in exam list rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    #[serde(deserialize_with = "deserialize_id", alias = "submission_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub exam_id: Option<String>,
    #[serde(default)]
    pub status: GradingStatus,
    #[serde(default, alias = "total_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub grading_job_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub graded_at: Option<DateTime<Utc>>,
}

impl SubmissionSummary {
    pub fn is_graded(&self) -> bool {
        self.status == GradingStatus::Graded
    }
}

/// Per-question grading outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub question_id: String,
    #[serde(
        default,
        alias = "question",
        alias = "prompt",
        deserialize_with = "deserialize_nullable_string"
    )]
    pub question_text: String,
    #[serde(default, alias = "answer", deserialize_with = "deserialize_nullable_string")]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default, alias = "points")]
    pub max_score: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// Full result of a graded (or grading) submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    #[serde(default, deserialize_with = "deserialize_optional_id", alias = "id")]
    pub submission_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub exam_id: Option<String>,
    #[serde(default)]
    pub status: GradingStatus,
    #[serde(default, alias = "score")]
    pub total_score: f64,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub overall_feedback: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, alias = "results", alias = "question_feedback")]
    pub question_results: Vec<QuestionResult>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub graded_at: Option<DateTime<Utc>>,
    /// Grading job while the result is still pending
    #[serde(default, alias = "job")]
    pub grading_job: Option<Job>,
}

impl GradingResult {
    /// Percentage as reported, or derived from the scores when absent.
    pub fn effective_percentage(&self) -> f64 {
        match self.percentage {
            Some(p) => p.clamp(0.0, 100.0),
            None if self.max_score > 0.0 => {
                (self.total_score / self.max_score * 100.0).clamp(0.0, 100.0)
            }
            None => 0.0,
        }
    }

    pub fn is_graded(&self) -> bool {
        self.status == GradingStatus::Graded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_graded() {
        let s: SubmissionSummary =
            serde_json::from_str(r#"{"submission_id": 9, "status": "completed"}"#).unwrap();
        assert_eq!(s.id, "9");
        assert!(s.is_graded());

        let pending: SubmissionSummary =
            serde_json::from_str(r#"{"id": "a", "status": "submitted"}"#).unwrap();
        assert!(!pending.is_graded());
    }

    #[test]
    fn test_result_full_shape() {
        let json = r#"{
            "submission_id": "sub1",
            "exam_id": "e1",
            "status": "graded",
            "score": 7.5,
            "max_score": 10,
            "overall_feedback": "Solid work",
            "strengths": ["definitions"],
            "weaknesses": ["proofs"],
            "recommendations": ["review chapter 3"],
            "results": [
                {"question_id": 1, "question": "Define X", "answer": "X is...", "score": 2, "max_score": 2, "is_correct": true},
                {"question_id": 2, "question": "Prove Y", "answer": null, "score": 0, "points": 3}
            ]
        }"#;
        let r: GradingResult = serde_json::from_str(json).unwrap();
        assert!(r.is_graded());
        assert_eq!(r.total_score, 7.5);
        assert_eq!(r.effective_percentage(), 75.0);
        assert_eq!(r.question_results.len(), 2);
        assert_eq!(r.question_results[1].user_answer, "");
        assert_eq!(r.question_results[1].max_score, 3.0);
    }

    #[test]
    fn test_pending_result_carries_job() {
        let json = r#"{"status": "grading", "job": {"id": "g1", "status": "processing", "progress": 30}}"#;
        let r: GradingResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, GradingStatus::Grading);
        assert_eq!(r.grading_job.as_ref().unwrap().progress, 30);
        assert_eq!(r.effective_percentage(), 0.0);
    }
}
