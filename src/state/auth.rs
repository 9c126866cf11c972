//! Sign-in / sign-up screen.

use std::sync::Arc;
use tracing::info;

use super::handle::StateHandle;
use crate::auth::{AuthService, SignUpForm};
use crate::error::{AppError, AppResult, StateError};
use crate::traits::IdentitySession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: String,
    pub busy: bool,
    /// Inline failure message
    pub error: Option<String>,
    /// Informational message (e.g. reset email sent)
    pub notice: Option<String>,
}

pub struct AuthViewModel {
    service: Arc<AuthService>,
    state: StateHandle<AuthFormState>,
}

impl AuthViewModel {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self {
            service,
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<AuthFormState> {
        &self.state
    }

    pub fn snapshot(&self) -> AuthFormState {
        self.state.snapshot()
    }

    fn edit(&self, f: impl FnOnce(&mut AuthFormState)) {
        self.state.update(|s| {
            f(s);
            s.error = None;
        });
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.edit(|s| s.email = email);
    }

    pub fn set_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.edit(|s| s.password = password);
    }

    pub fn set_confirm_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.edit(|s| s.confirm_password = password);
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.edit(|s| s.display_name = name);
    }

    /// Switch between sign-in and sign-up; passwords are cleared.
    pub fn toggle_mode(&self) {
        self.edit(|s| {
            s.mode = match s.mode {
                AuthMode::SignIn => AuthMode::SignUp,
                AuthMode::SignUp => AuthMode::SignIn,
            };
            s.password.clear();
            s.confirm_password.clear();
            s.notice = None;
        });
    }

    fn begin(&self) -> AppResult<AuthFormState> {
        self.state
            .update(|s| {
                if s.busy {
                    return Err(StateError::SubmitInProgress);
                }
                s.busy = true;
                s.error = None;
                s.notice = None;
                Ok(s.clone())
            })
            .unwrap_or(Err(StateError::Disposed))
            .map_err(AppError::from)
    }

    fn finish<T>(&self, result: AppResult<T>) -> AppResult<T> {
        let error = result.as_ref().err().map(AppError::user_message);
        self.state.update(|s| {
            s.busy = false;
            s.error = error;
        });
        result
    }

    /// Sign in or sign up, depending on the mode. Credential checks run
    /// before the identity provider is contacted.
    pub async fn submit(&self) -> AppResult<IdentitySession> {
        let form = self.begin()?;
        let result = match form.mode {
            AuthMode::SignIn => self.service.sign_in(&form.email, &form.password).await,
            AuthMode::SignUp => {
                self.service
                    .sign_up(&SignUpForm {
                        email: form.email,
                        password: form.password,
                        confirm_password: form.confirm_password,
                        display_name: form.display_name,
                    })
                    .await
            }
        };
        if let Ok(session) = &result {
            info!("Signed in as {}", session.email);
        }
        self.finish(result)
    }

    /// Complete a Google sign-in with the id token from the platform flow;
    /// `None` means the user cancelled.
    pub async fn sign_in_with_google(&self, id_token: Option<&str>) -> AppResult<IdentitySession> {
        self.begin()?;
        let result = self.service.sign_in_with_google(id_token).await;
        self.finish(result)
    }

    pub async fn send_password_reset(&self) -> AppResult<()> {
        let form = self.begin()?;
        let result = self.service.send_password_reset(&form.email).await;
        if result.is_ok() {
            self.state.update(|s| {
                s.notice = Some(format!("Password reset email sent to {}", form.email.trim()));
            });
        }
        self.finish(result)
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
