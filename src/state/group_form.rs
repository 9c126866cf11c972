//! Create or edit a group.

use tracing::info;

use super::form::{validate_description, validate_name, FormMode};
use super::handle::StateHandle;
use crate::api::ApiClient;
use crate::error::{AppResult, StateError, ValidationError};
use crate::models::{CreateGroupRequest, Group, UpdateGroupRequest};

#[derive(Debug, Clone, Default)]
pub struct GroupFormState {
    pub mode: FormMode,
    pub name: String,
    pub description: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub saving: bool,
    pub error: Option<String>,
    /// Set after a successful save; the screen closes on it
    pub saved: Option<Group>,
    pub deleted: bool,
}

impl GroupFormState {
    pub fn validate(&self) -> Result<CreateGroupRequest, ValidationError> {
        Ok(CreateGroupRequest {
            name: validate_name(&self.name)?,
            description: validate_description(&self.description)?,
            color: self.color.clone(),
            icon: self.icon.clone(),
        })
    }
}

pub struct GroupFormViewModel {
    api: ApiClient,
    state: StateHandle<GroupFormState>,
}

impl GroupFormViewModel {
    pub fn create(api: ApiClient) -> Self {
        Self {
            api,
            state: StateHandle::default(),
        }
    }

    /// Form prefilled from an existing group.
    pub fn edit(api: ApiClient, group: &Group) -> Self {
        Self {
            api,
            state: StateHandle::new(GroupFormState {
                mode: FormMode::Edit {
                    id: group.id.clone(),
                },
                name: group.name.clone(),
                description: group.description.clone().unwrap_or_default(),
                color: group.color.clone(),
                icon: group.icon.clone(),
                ..GroupFormState::default()
            }),
        }
    }

    pub fn state(&self) -> &StateHandle<GroupFormState> {
        &self.state
    }

    pub fn snapshot(&self) -> GroupFormState {
        self.state.snapshot()
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

    pub fn set_color(&self, color: Option<String>) {
        self.state.update(|s| s.color = color);
    }

    pub fn set_icon(&self, icon: Option<String>) {
        self.state.update(|s| s.icon = icon);
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

    fn fail<T>(&self, err: crate::error::AppError) -> AppResult<T> {
        let message = err.user_message();
        self.state.update(|s| {
            s.saving = false;
            s.error = Some(message);
        });
        Err(err)
    }

    /// Create or update, depending on the mode.
    pub async fn save(&self) -> AppResult<Group> {
        let (mode, request) = self.state.read(|s| (s.mode.clone(), s.validate()));
        let request = match request {
            Ok(request) => request,
            Err(err) => return self.fail(err.into()),
        };
        self.begin_saving()?;

        let result = match &mode {
            FormMode::Create => self.api.create_group(&request).await,
            FormMode::Edit { id } => {
                let update = UpdateGroupRequest {
                    name: Some(request.name),
                    // empty string clears the description
                    description: Some(request.description.unwrap_or_default()),
                    color: request.color,
                    icon: request.icon,
                };
                self.api.update_group(id, &update).await
            }
        };

        match result {
            Ok(group) => {
                info!("Saved group {}", group.id);
                self.state.update(|s| {
                    s.saving = false;
                    s.mode = FormMode::Edit {
                        id: group.id.clone(),
                    };
                    s.saved = Some(group.clone());
                });
                Ok(group)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Delete the edited group. Subjects in it become ungrouped.
    pub async fn delete(&self) -> AppResult<()> {
        let FormMode::Edit { id } = self.state.read(|s| s.mode.clone()) else {
            return Err(StateError::NotLoaded { what: "group" }.into());
        };
        self.begin_saving()?;
        match self.api.delete_group(&id).await {
            Ok(()) => {
                info!("Deleted group {}", id);
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

    #[tokio::test]
    async fn test_create_trims_fields() {
        let fx = Fixture::new();
        fx.http.set_method_response(
            "POST",
            &fx.url("/api/groups"),
            MockResponse::json(201, &json!({"id": "g7", "name": "Year 2"})),
        );
        let vm = GroupFormViewModel::create(fx.api.clone());
        vm.set_name("  Year 2 ");
        vm.set_description("   ");

        let group = vm.save().await.unwrap();
        assert_eq!(group.id, "g7");
        let body = fx.http.requests_to("POST", &fx.url("/api/groups"))[0]
            .json_body()
            .unwrap();
        assert_eq!(body, json!({"name": "Year 2"}));
        assert_eq!(vm.snapshot().mode, FormMode::Edit { id: "g7".to_string() });
    }

    #[tokio::test]
    async fn test_empty_name_rejected_locally() {
        let fx = Fixture::new();
        let vm = GroupFormViewModel::create(fx.api.clone());
        vm.set_name(" ");

        assert!(vm.save().await.is_err());
        let state = vm.snapshot();
        assert_eq!(state.error.as_deref(), Some("Name is required"));
        assert!(!state.saving);
        assert!(fx.http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let fx = Fixture::new();
        let group: Group =
            serde_json::from_value(json!({"id": "g1", "name": "Old", "description": "notes"})).unwrap();
        fx.http.set_method_response(
            "PUT",
            &fx.url("/api/groups/g1"),
            MockResponse::json(200, &json!({"id": "g1", "name": "New"})),
        );
        fx.http
            .set_method_response("DELETE", &fx.url("/api/groups/g1"), MockResponse::status(204));
        let vm = GroupFormViewModel::edit(fx.api.clone(), &group);
        assert_eq!(vm.snapshot().description, "notes");

        vm.set_name("New");
        vm.set_description("");
        vm.save().await.unwrap();
        let body = fx.http.requests_to("PUT", &fx.url("/api/groups/g1"))[0]
            .json_body()
            .unwrap();
        assert_eq!(body, json!({"name": "New", "description": ""}));

        vm.delete().await.unwrap();
        assert!(vm.snapshot().deleted);
    }

    #[tokio::test]
    async fn test_delete_needs_existing_group() {
        let fx = Fixture::new();
        let vm = GroupFormViewModel::create(fx.api.clone());
        assert!(vm.delete().await.is_err());
        assert!(fx.http.get_requests().is_empty());
    }
}
