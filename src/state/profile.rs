//! Profile screen.

use tracing::info;

use super::handle::StateHandle;
use super::resource::{run_load, Resource};
use crate::api::ApiClient;
use crate::auth::validation::MAX_DISPLAY_NAME_LEN;
use crate::error::{AppResult, StateError, ValidationError};
use crate::models::{LanguageOption, UpdateProfileRequest, UserProfile};

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Resource<UserProfile>,
    pub languages: Resource<Vec<LanguageOption>>,
    pub saving: bool,
    pub notice: Option<String>,
}

pub struct ProfileViewModel {
    api: ApiClient,
    state: StateHandle<ProfileState>,
}

impl ProfileViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<ProfileState> {
        &self.state
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.snapshot()
    }

    pub async fn load(&self, force: bool) -> AppResult<()> {
        let (profile, languages) = tokio::join!(
            run_load(
                &self.state,
                |s: &mut ProfileState| &mut s.profile,
                force,
                "profile",
                self.api.get_profile(),
            ),
            run_load(
                &self.state,
                |s: &mut ProfileState| &mut s.languages,
                force,
                "languages",
                self.api.supported_languages(),
            ),
        );
        profile?;
        languages?;
        Ok(())
    }

    /// Build the update body. `None` leaves a field unchanged; a blank
    /// display name is rejected. The language must be one of the loaded
    /// options when the list is available.
    fn validate(
        &self,
        display_name: Option<&str>,
        language: Option<&str>,
    ) -> Result<UpdateProfileRequest, ValidationError> {
        let display_name = match display_name.map(str::trim) {
            Some("") => return Err(ValidationError::Required { field: "Display name" }),
            Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LEN => {
                return Err(ValidationError::TooLong {
                    field: "Display name",
                    max: MAX_DISPLAY_NAME_LEN,
                })
            }
            other => other.map(str::to_string),
        };
        let language = match language.map(str::trim) {
            Some("") => return Err(ValidationError::Required { field: "Language" }),
            Some(code) => {
                let offered = self.state.read(|s| {
                    s.languages
                        .data()
                        .map_or(true, |langs| langs.iter().any(|l| l.code == code))
                });
                if !offered {
                    return Err(ValidationError::UnsupportedLanguage {
                        code: code.to_string(),
                    });
                }
                Some(code.to_string())
            }
            None => None,
        };
        Ok(UpdateProfileRequest {
            display_name,
            language_preference: language,
        })
    }

    pub async fn update(
        &self,
        display_name: Option<&str>,
        language: Option<&str>,
    ) -> AppResult<UserProfile> {
        let request = self.validate(display_name, language)?;

        let started = self
            .state
            .update(|s| !std::mem::replace(&mut s.saving, true))
            .ok_or(StateError::Disposed)?;
        if !started {
            return Err(StateError::SubmitInProgress.into());
        }

        let result = self.api.update_profile(&request).await;
        match &result {
            Ok(profile) => {
                info!("Profile updated");
                let profile = profile.clone();
                self.state.update(|s| {
                    s.saving = false;
                    s.profile.replace(profile);
                    s.notice = Some("Profile saved".to_string());
                });
            }
            Err(err) => {
                let message = err.user_message();
                self.state.update(|s| {
                    s.saving = false;
                    s.notice = Some(message);
                });
            }
        }
        result
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
