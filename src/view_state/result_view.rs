//! Display record for a graded (or grading) submission.

use super::job_view::JobView;
use super::labels::BadgeColor;
use crate::models::{GradingResult, GradingStatus, QuestionResult};

/// Overall grade bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl GradeBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            GradeBand::Excellent
        } else if percentage >= 75.0 {
            GradeBand::Good
        } else if percentage >= 60.0 {
            GradeBand::Fair
        } else {
            GradeBand::NeedsWork
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeBand::Excellent => "Excellent",
            GradeBand::Good => "Good",
            GradeBand::Fair => "Fair",
            GradeBand::NeedsWork => "Needs work",
        }
    }

    pub fn badge(&self) -> BadgeColor {
        match self {
            GradeBand::Excellent => BadgeColor::Green,
            GradeBand::Good => BadgeColor::Blue,
            GradeBand::Fair => BadgeColor::Amber,
            GradeBand::NeedsWork => BadgeColor::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Partial,
    Incorrect,
}

impl AnswerOutcome {
    fn of(result: &QuestionResult) -> Self {
        match result.is_correct {
            Some(true) => AnswerOutcome::Correct,
            _ if result.max_score > 0.0 && result.score >= result.max_score => AnswerOutcome::Correct,
            _ if result.score > 0.0 => AnswerOutcome::Partial,
            _ => AnswerOutcome::Incorrect,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    /// 1-based position
    pub number: usize,
    pub question_id: String,
    pub prompt: String,
    pub answer: String,
    pub correct_answer: Option<String>,
    pub score_label: String,
    pub outcome: AnswerOutcome,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub graded: bool,
    pub status_label: &'static str,
    /// `"7.5 / 10"`
    pub score_label: String,
    pub percentage: f64,
    /// `"75%"`
    pub percentage_label: String,
    /// Only set once graded
    pub grade: Option<GradeBand>,
    pub overall_feedback: Option<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub rows: Vec<QuestionRow>,
    /// Grading job, while grading is pending
    pub grading_job: Option<JobView>,
}

impl ResultView {
    pub fn new(result: &GradingResult) -> Self {
        let graded = result.is_graded();
        let percentage = result.effective_percentage();
        let status_label = match result.status {
            GradingStatus::Pending => "Waiting for grading",
            GradingStatus::Grading => "Grading",
            GradingStatus::Graded => "Graded",
            GradingStatus::Failed => "Grading failed",
            GradingStatus::Unknown => "Unknown",
        };

        Self {
            graded,
            status_label,
            score_label: format!(
                "{} / {}",
                format_points(result.total_score),
                format_points(result.max_score)
            ),
            percentage,
            percentage_label: format!("{:.0}%", percentage),
            grade: graded.then(|| GradeBand::from_percentage(percentage)),
            overall_feedback: result.overall_feedback.clone(),
            strengths: result.strengths.clone(),
            weaknesses: result.weaknesses.clone(),
            recommendations: result.recommendations.clone(),
            rows: result
                .question_results
                .iter()
                .enumerate()
                .map(|(i, q)| QuestionRow {
                    number: i + 1,
                    question_id: q.question_id.clone(),
                    prompt: q.question_text.clone(),
                    answer: if q.user_answer.trim().is_empty() {
                        "No answer".to_string()
                    } else {
                        q.user_answer.clone()
                    },
                    correct_answer: q.correct_answer.clone(),
                    score_label: format!("{} / {}", format_points(q.score), format_points(q.max_score)),
                    outcome: AnswerOutcome::of(q),
                    feedback: q.feedback.clone(),
                })
                .collect(),
            grading_job: result
                .grading_job
                .as_ref()
                .filter(|_| !graded)
                .map(JobView::new),
        }
    }

    pub fn correct_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.outcome == AnswerOutcome::Correct)
            .count()
    }
}

/// Points without a trailing `.0`; at most two decimals.
pub fn format_points(points: f64) -> String {
    let rounded = (points * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
