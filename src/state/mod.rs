//! Per-screen view models.
//!
//! Each screen owns one view model, constructed with its route parameters
//! and disposed when the screen goes away. A view model publishes its state
//! through a [`StateHandle`]; remote concerns inside that state are tracked
//! as [`Resource`]s.

pub mod auth;
pub mod dashboard;
pub mod exam_generation;
pub mod exam_list;
pub mod exam_result;
pub mod exam_taking;
pub mod form;
pub mod group_form;
pub mod handle;
pub mod profile;
pub mod resource;
pub mod subject_detail;
pub mod subject_form;
pub mod upload;

pub use auth::{AuthFormState, AuthMode, AuthViewModel};
pub use dashboard::{DashboardState, DashboardTotals, DashboardViewModel, GroupFilter};
pub use exam_generation::{
    AiProvider, ExamGenerationState, ExamGenerationViewModel, GenerationForm, MAX_QUESTIONS,
    MIN_QUESTIONS,
};
pub use exam_list::{ExamListState, ExamListViewModel};
pub use exam_result::{ExamResultState, ExamResultViewModel};
pub use exam_taking::{build_submission, ExamTakingState, ExamTakingViewModel, SubmitPhase};
pub use form::{FormMode, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
pub use group_form::{GroupFormState, GroupFormViewModel};
pub use handle::StateHandle;
pub use profile::{ProfileState, ProfileViewModel};
pub use resource::{LoadOutcome, Phase, Resource, Ticket};
pub use subject_detail::{SubjectDetailState, SubjectDetailViewModel};
pub use subject_form::{SubjectFormState, SubjectFormViewModel};
pub use upload::{UploadFile, UploadQueue, UploadReport, UploadState};
