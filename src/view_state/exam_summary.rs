//! List-row view of an exam.

use super::labels::{language_label, short_id, BadgeColor};
use crate::models::{Exam, ExamStatus, GradingStatus, Job, JobKind};

/// Pre-computed view data for one exam row.
///
/// The take/result actions follow from the server-reported state:
/// - `can_take`: questions are ready, nothing has been submitted and no job
///   is queued or running for the exam.
/// - `can_view_result`: the submission has been graded.
///
/// Both are false for drafts and for submissions still waiting on grading.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSummaryView {
    pub id: String,
    pub title: String,
    /// `#` plus the last six characters of the id
    pub short_id: String,
    pub question_count: u32,
    pub status_label: String,
    pub badge: BadgeColor,
    pub difficulty_label: String,
    pub language_label: String,
    pub can_take: bool,
    pub can_view_result: bool,
    /// A generation or grading job is active
    pub show_progress: bool,
    /// Latest progress reported by the active job (0-100)
    pub progress: u8,
    /// `"82%"` once graded
    pub score_label: Option<String>,
}

impl ExamSummaryView {
    /// Build the row from the exam and any jobs known for its subject.
    ///
    /// Jobs are matched on `exam_id`; a job embedded in the exam record is
    /// considered too.
    pub fn new(exam: &Exam, subject_jobs: &[Job]) -> Self {
        let active_job = exam
            .latest_job
            .iter()
            .chain(subject_jobs.iter().filter(|j| j.exam_id.as_deref() == Some(exam.id.as_str())))
            .filter(|j| j.status.is_active())
            .max_by_key(|j| j.created_at);

        let submission = exam.submission.as_ref();
        let graded = submission.map_or(false, |s| s.is_graded());
        let has_active_job = active_job.is_some();

        let can_take = exam.status == ExamStatus::Completed && submission.is_none() && !has_active_job;
        let can_view_result = graded;
        let show_progress = exam.status.is_generating() || has_active_job;

        let (status_label, badge) = Self::status(exam, active_job);

        let score_label = submission
            .filter(|s| s.is_graded())
            .and_then(|s| s.percentage)
            .map(|p| format!("{:.0}%", p.clamp(0.0, 100.0)));

        let title = if exam.title.trim().is_empty() {
            format!("Exam #{}", short_id(&exam.id))
        } else {
            exam.title.clone()
        };

        Self {
            id: exam.id.clone(),
            title,
            short_id: format!("#{}", short_id(&exam.id)),
            question_count: exam.question_count.max(exam.questions.len() as u32),
            status_label: status_label.to_string(),
            badge,
            difficulty_label: exam.difficulty.label().to_string(),
            language_label: exam
                .language
                .as_deref()
                .map(language_label)
                .unwrap_or("")
                .to_string(),
            can_take,
            can_view_result,
            show_progress,
            progress: active_job.map_or(0, |j| j.progress),
            score_label,
        }
    }

    fn status(exam: &Exam, active_job: Option<&Job>) -> (&'static str, BadgeColor) {
        if let Some(job) = active_job {
            return match job.kind {
                JobKind::Grading => ("Grading", BadgeColor::Amber),
                _ => ("Generating", BadgeColor::Blue),
            };
        }
        if let Some(submission) = &exam.submission {
            return match submission.status {
                GradingStatus::Graded => ("Graded", BadgeColor::Purple),
                GradingStatus::Failed => ("Grading failed", BadgeColor::Red),
                _ => ("Submitted", BadgeColor::Amber),
            };
        }
        let badge = match exam.status {
            ExamStatus::Draft | ExamStatus::Archived | ExamStatus::Unknown => BadgeColor::Gray,
            ExamStatus::Pending | ExamStatus::Processing => BadgeColor::Blue,
            ExamStatus::Completed => BadgeColor::Green,
            ExamStatus::Failed => BadgeColor::Red,
        };
        (exam.status.label(), badge)
    }
}

/// Map a list of exams to rows.
pub fn summarize(exams: &[Exam], subject_jobs: &[Job]) -> Vec<ExamSummaryView> {
    exams
        .iter()
        .map(|exam| ExamSummaryView::new(exam, subject_jobs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(json: serde_json::Value) -> Exam {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_three_exam_scenario() {
        let exams = vec![
            exam(serde_json::json!({
                "id": "exam-graded-000001", "title": "Graded", "status": "completed",
                "submission": {"id": "s1", "status": "graded", "percentage": 81.6}
            })),
            exam(serde_json::json!({
                "id": "exam-processing-02", "title": "Processing", "status": "processing",
                "job": {"id": "j2", "status": "processing", "progress": 40}
            })),
            exam(serde_json::json!({"id": "exam-draft-000003", "title": "Draft", "status": "draft"})),
        ];

        let rows = summarize(&exams, &[]);
        assert_eq!(rows.iter().filter(|r| r.can_view_result).count(), 1);
        assert_eq!(rows.iter().filter(|r| r.can_take).count(), 0);
        assert_eq!(rows.iter().filter(|r| r.show_progress).count(), 1);

        assert_eq!(rows[0].score_label.as_deref(), Some("82%"));
        assert_eq!(rows[0].badge, BadgeColor::Purple);
        assert_eq!(rows[1].progress, 40);
        assert_eq!(rows[1].status_label, "Generating");
        assert_eq!(rows[2].status_label, "Draft");
    }

    #[test]
    fn test_graded_is_never_takeable() {
        let row = ExamSummaryView::new(
            &exam(serde_json::json!({
                "id": "e", "status": "completed",
                "submission": {"id": "s", "status": "graded"}
            })),
            &[],
        );
        assert!(row.can_view_result);
        assert!(!row.can_take);
    }

    #[test]
    fn test_ready_exam_is_takeable() {
        let row = ExamSummaryView::new(
            &exam(serde_json::json!({"id": "e", "status": "completed", "language": "ar"})),
            &[],
        );
        assert!(row.can_take);
        assert!(!row.can_view_result);
        assert!(!row.show_progress);
        assert_eq!(row.language_label, "Arabic");
        assert_eq!(row.badge, BadgeColor::Green);
    }

    #[test]
    fn test_active_subject_job_blocks_taking() {
        let ready = exam(serde_json::json!({"id": "e1", "status": "completed"}));
        let jobs: Vec<Job> = serde_json::from_value(serde_json::json!([
            {"id": "g1", "exam_id": "e1", "status": "pending", "job_type": "grading", "progress": 5},
            {"id": "g0", "exam_id": "other", "status": "processing"}
        ]))
        .unwrap();

        let row = ExamSummaryView::new(&ready, &jobs);
        assert!(!row.can_take);
        assert!(row.show_progress);
        assert_eq!(row.status_label, "Grading");
        assert_eq!(row.progress, 5);
    }

    #[test]
    fn test_terminal_job_does_not_block() {
        let ready = exam(serde_json::json!({
            "id": "e1", "status": "completed",
            "job": {"id": "j", "status": "completed", "progress": 100}
        }));
        let row = ExamSummaryView::new(&ready, &[]);
        assert!(row.can_take);
        assert!(!row.show_progress);
    }

    #[test]
    fn test_pending_grading_shows_neither_action() {
        let row = ExamSummaryView::new(
            &exam(serde_json::json!({
                "id": "e", "status": "completed",
                "submission": {"id": "s", "status": "grading"}
            })),
            &[],
        );
        assert!(!row.can_take);
        assert!(!row.can_view_result);
        assert_eq!(row.status_label, "Submitted");
    }

    #[test]
    fn test_untitled_exam_uses_short_id() {
        let row = ExamSummaryView::new(&exam(serde_json::json!({"id": "abc"})), &[]);
        assert_eq!(row.title, "Exam #abc");
        assert_eq!(row.short_id, "#abc");
    }
}
