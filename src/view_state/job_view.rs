//! Display record for a generation or grading job.

use chrono::{DateTime, Utc};

use super::labels::{short_id, BadgeColor};
use crate::models::{Job, JobKind, JobStatus};

/// Pre-computed view data for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub id: String,
    pub short_id: String,
    pub kind_label: &'static str,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub badge: BadgeColor,
    /// Backend-reported percentage; never estimated locally
    pub progress: u8,
    /// Time since start (or creation), frozen at the finishing transition
    pub elapsed: String,
    pub error: Option<String>,
    pub can_cancel: bool,
}

impl JobView {
    pub fn new(job: &Job) -> Self {
        Self::at(job, Utc::now())
    }

    /// Build against an explicit clock value.
    pub fn at(job: &Job, now: DateTime<Utc>) -> Self {
        let badge = match job.status {
            JobStatus::Pending => BadgeColor::Gray,
            JobStatus::Processing => BadgeColor::Blue,
            JobStatus::Completed => BadgeColor::Green,
            JobStatus::Failed => BadgeColor::Red,
            JobStatus::Cancelled | JobStatus::Unknown => BadgeColor::Gray,
        };
        let start = job.started_at.or(job.created_at);
        let end = job.finished_at().unwrap_or(now);
        let elapsed = start
            .map(|start| format_elapsed((end - start).num_seconds()))
            .unwrap_or_default();
        let progress = if job.status == JobStatus::Completed {
            100
        } else {
            job.progress
        };

        Self {
            id: job.id.clone(),
            short_id: short_id(&job.id).to_string(),
            kind_label: match job.kind {
                JobKind::Grading => "Grading",
                _ => "Exam generation",
            },
            status: job.status,
            status_label: job.status.label(),
            badge,
            progress,
            elapsed,
            error: job
                .error_message
                .clone()
                .filter(|_| job.status == JobStatus::Failed),
            can_cancel: job.status.is_active(),
        }
    }
}

/// `"45s"`, `"3m 07s"`, `"1h 02m"`.
pub fn format_elapsed(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(-4), "0s");
        assert_eq!(format_elapsed(45), "45s");
        assert_eq!(format_elapsed(187), "3m 07s");
        assert_eq!(format_elapsed(3720), "1h 02m");
    }

    #[test]
    fn test_running_job_view() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": "job-123456789",
            "status": "processing",
            "progress": 35,
            "started_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap();
        let view = JobView::at(&job, now);

        assert_eq!(view.short_id, "456789");
        assert_eq!(view.kind_label, "Exam generation");
        assert_eq!(view.progress, 35);
        assert_eq!(view.elapsed, "1m 30s");
        assert!(view.can_cancel);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_failed_job_view_freezes_elapsed() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": "j",
            "job_type": "grading",
            "status": "failed",
            "progress": 60,
            "error_message": "model timeout",
            "created_at": "2024-01-01T00:00:00Z",
            "failed_at": "2024-01-01T00:00:20Z"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let view = JobView::at(&job, now);

        assert_eq!(view.elapsed, "20s");
        assert_eq!(view.badge, BadgeColor::Red);
        assert_eq!(view.error.as_deref(), Some("model timeout"));
        assert!(!view.can_cancel);
    }
}
