//! UI-ready records derived from the backend models.
//!
//! Screens render these directly; all derivation (which actions are
//! available, labels, badge colors) happens here so it can be tested without
//! a UI.

pub mod exam_summary;
pub mod job_view;
pub mod labels;
pub mod progress;
pub mod result_view;

pub use exam_summary::{summarize, ExamSummaryView};
pub use job_view::{format_elapsed, JobView};
pub use labels::{language_label, short_id, BadgeColor};
pub use progress::Progress;
pub use result_view::{format_points, AnswerOutcome, GradeBand, QuestionRow, ResultView};
