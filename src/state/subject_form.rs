//! Create or edit a subject.

use tracing::info;

use super::form::{validate_description, validate_name, FormMode};
use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::error::{AppError, AppResult, StateError, ValidationError};
use crate::models::{CreateSubjectRequest, Group, Subject, UpdateSubjectRequest};

#[derive(Debug, Clone, Default)]
pub struct SubjectFormState {
    pub mode: FormMode,
    pub name: String,
    pub description: String,
    /// `None` keeps the subject outside any group
    pub group_id: Option<String>,
    pub language_preference: Option<String>,
    pub color: Option<String>,
    /// Groups offered in the picker
    pub groups: Resource<Vec<Group>>,
    pub saving: bool,
    pub error: Option<String>,
    pub saved: Option<Subject>,
    pub deleted: bool,
}

impl SubjectFormState {
    /// Check the fields; a selected group must be one of the loaded groups.
    pub fn validate(&self) -> Result<CreateSubjectRequest, ValidationError> {
        let name = validate_name(&self.name)?;
        let description = validate_description(&self.description)?;
        if let Some(group_id) = &self.group_id {
            let known = self
                .groups
                .data()
                .map_or(false, |groups| groups.iter().any(|g| &g.id == group_id));
            if !known {
                return Err(ValidationError::UnknownGroup {
                    group_id: group_id.clone(),
                });
            }
        }
        Ok(CreateSubjectRequest {
            name,
            description,
            group_id: self.group_id.clone(),
            language_preference: self
                .language_preference
                .clone()
                .filter(|l| !l.trim().is_empty()),
            color: self.color.clone(),
        })
    }
}

pub struct SubjectFormViewModel {
    api: ApiClient,
    state: StateHandle<SubjectFormState>,
}

impl SubjectFormViewModel {
    /// New subject, optionally preselecting a group.
    pub fn create(api: ApiClient, group_id: Option<String>) -> Self {
        Self {
            api,
            state: StateHandle::new(SubjectFormState {
                group_id,
                ..SubjectFormState::default()
            }),
        }
    }

    pub fn edit(api: ApiClient, subject: &Subject) -> Self {
        Self {
            api,
            state: StateHandle::new(SubjectFormState {
                mode: FormMode::Edit {
                    id: subject.id.clone(),
                },
                name: subject.name.clone(),
                description: subject.description.clone().unwrap_or_default(),
                group_id: subject.group_id.clone(),
                language_preference: subject.language_preference.clone(),
                color: subject.color.clone(),
                ..SubjectFormState::default()
            }),
        }
    }

    pub fn state(&self) -> &StateHandle<SubjectFormState> {
        &self.state
    }

    pub fn snapshot(&self) -> SubjectFormState {
        self.state.snapshot()
    }

    pub async fn load_groups(&self, force: bool) -> AppResult<LoadOutcome> {
        run_load(
            &self.state,
            |s: &mut SubjectFormState| &mut s.groups,
            force,
            "groups",
            self.api.list_groups(),
        )
        .await
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.update(|s| {
            s.name = name;
            s.error = None;
        });
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.state.update(|s| {
            s.description = description;
            s.error = None;
        });
    }

    pub fn set_group(&self, group_id: Option<String>) {
        self.state.update(|s| {
            s.group_id = group_id;
            s.error = None;
        });
    }

    pub fn set_language(&self, code: Option<String>) {
        self.state.update(|s| s.language_preference = code);
    }

    pub fn set_color(&self, color: Option<String>) {
        self.state.update(|s| s.color = color);
    }

    fn fail<T>(&self, err: AppError) -> AppResult<T> {
        let message = err.user_message();
        self.state.update(|s| {
            s.saving = false;
            s.error = Some(message);
        });
        Err(err)
    }

    fn begin_saving(&self) -> AppResult<()> {
        let started = self
            .state
            .update(|s| !std::mem::replace(&mut s.saving, true))
            .ok_or(StateError::Disposed)?;
        if started {
            Ok(())
        } else {
            Err(StateError::SubmitInProgress.into())
        }
    }

    pub async fn save(&self) -> AppResult<Subject> {
        let needs_groups = self
            .state
            .read(|s| s.group_id.is_some() && s.groups.data().is_none());
        if needs_groups {
            if let Err(err) = self.load_groups(false).await {
                return self.fail(err);
            }
        }

        let (mode, request) = self.state.read(|s| (s.mode.clone(), s.validate()));
        let request = match request {
            Ok(request) => request,
            Err(err) => return self.fail(err.into()),
        };
        self.begin_saving()?;

        let result = match &mode {
            FormMode::Create => self.api.create_subject(&request).await,
            FormMode::Edit { id } => {
                let update = UpdateSubjectRequest {
                    name: Some(request.name),
                    description: Some(request.description.unwrap_or_default()),
                    group_id: request.group_id,
                    language_preference: request.language_preference,
                    color: request.color,
                };
                self.api.update_subject(id, &update).await
            }
        };

        match result {
            Ok(subject) => {
                info!("Saved subject {}", subject.id);
                self.state.update(|s| {
                    s.saving = false;
                    s.mode = FormMode::Edit {
                        id: subject.id.clone(),
                    };
                    s.saved = Some(subject.clone());
                });
                Ok(subject)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Delete the edited subject with its PDFs and exams.
    pub async fn delete(&self) -> AppResult<()> {
        let FormMode::Edit { id } = self.state.read(|s| s.mode.clone()) else {
            return Err(StateError::NotLoaded { what: "subject" }.into());
        };
        self.begin_saving()?;
        match self.api.delete_subject(&id).await {
            Ok(()) => {
                info!("Deleted subject {}", id);
                self.state.update(|s| {
                    s.saving = false;
                    s.deleted = true;
                });
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockResponse;
    use crate::state::testing::Fixture;
    use serde_json::json;

    fn with_groups(fx: &Fixture) {
        fx.http.set_method_response(
            "GET",
            &fx.url("/api/groups"),
            MockResponse::json(200, &json!([{"id": "g1", "name": "Science"}])),
        );
    }

    #[tokio::test]
    async fn test_create_in_group_loads_groups_first() {
        let fx = Fixture::new();
        with_groups(&fx);
        fx.http.set_method_response(
            "POST",
            &fx.url("/api/subjects"),
            MockResponse::json(201, &json!({"id": "s9", "name": "Biology", "group_id": "g1"})),
        );
        let vm = SubjectFormViewModel::create(fx.api.clone(), Some("g1".to_string()));
        vm.set_name("Biology");
        vm.set_language(Some("en".to_string()));

        let subject = vm.save().await.unwrap();
        assert_eq!(subject.group_id.as_deref(), Some("g1"));
        assert_eq!(fx.http.count("GET", &fx.url("/api/groups")), 1);
        let body = fx.http.requests_to("POST", &fx.url("/api/subjects"))[0]
            .json_body()
            .unwrap();
        assert_eq!(
            body,
            json!({"name": "Biology", "group_id": "g1", "language_preference": "en"})
        );
    }

    #[tokio::test]
    async fn test_unknown_group_rejected() {
        let fx = Fixture::new();
        with_groups(&fx);
        let vm = SubjectFormViewModel::create(fx.api.clone(), None);
        vm.load_groups(false).await.unwrap();
        vm.set_name("Biology");
        vm.set_group(Some("gone".to_string()));

        let err = vm.save().await.unwrap_err();
        assert_eq!(err.error_code(), "E_VAL_GROUP");
        assert!(fx.http.requests_to("POST", &fx.url("/api/subjects")).is_empty());
    }

    #[tokio::test]
    async fn test_long_description_rejected() {
        let fx = Fixture::new();
        let vm = SubjectFormViewModel::create(fx.api.clone(), None);
        vm.set_name("History");
        vm.set_description("d".repeat(501));

        let err = vm.save().await.unwrap_err();
        assert_eq!(err.error_code(), "E_VAL_TOO_LONG");
        assert!(fx.http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_edit_moves_out_of_group() {
        let fx = Fixture::new();
        let subject: Subject =
            serde_json::from_value(json!({"id": "s1", "name": "Physics", "group_id": "g1"})).unwrap();
        fx.http.set_method_response(
            "PUT",
            &fx.url("/api/subjects/s1"),
            MockResponse::json(200, &json!({"id": "s1", "name": "Physics"})),
        );
        let vm = SubjectFormViewModel::edit(fx.api.clone(), &subject);
        vm.set_group(None);

        vm.save().await.unwrap();
        let body = fx.http.requests_to("PUT", &fx.url("/api/subjects/s1"))[0]
            .json_body()
            .unwrap();
        assert_eq!(body["group_id"], serde_json::Value::Null);
        assert_eq!(body["name"], json!("Physics"));
    }
}
