//! Operations refused because of the holder's current state.

use thiserror::Error;

/// The action is not valid right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("No questions are loaded for this exam")]
    NoQuestionsLoaded,

    #[error("This exam has already been submitted")]
    AlreadySubmitted,

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("Unknown question {question_id}")]
    UnknownQuestion { question_id: String },

    #[error("No generation job has been started")]
    NoActiveJob,

    #[error("The job has already finished")]
    JobFinished,

    #[error("Nothing to edit: {what} is not loaded")]
    NotLoaded { what: &'static str },

    #[error("An upload is already running")]
    UploadInProgress,

    #[error("This screen has been closed")]
    Disposed,
}

impl StateError {
    /// Message shown in a snackbar.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StateError::NoQuestionsLoaded => "E_STATE_NO_QUESTIONS",
            StateError::AlreadySubmitted => "E_STATE_SUBMITTED",
            StateError::SubmitInProgress => "E_STATE_SUBMITTING",
            StateError::UnknownQuestion { .. } => "E_STATE_QUESTION",
            StateError::NoActiveJob => "E_STATE_NO_JOB",
            StateError::JobFinished => "E_STATE_JOB_DONE",
            StateError::NotLoaded { .. } => "E_STATE_NOT_LOADED",
            StateError::UploadInProgress => "E_STATE_UPLOADING",
            StateError::Disposed => "E_STATE_DISPOSED",
        }
    }
}
