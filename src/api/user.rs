//! `/api/user`

use serde::Deserialize;

use super::client::{decode_item, decode_list, ApiClient};
use crate::error::AppResult;
use crate::models::{LanguageOption, UpdateProfileRequest, UserProfile};

/// The languages endpoint returns either codes or full records.
#[derive(Deserialize)]
#[serde(untagged)]
enum LanguageEntry {
    Code(String),
    Full(LanguageOption),
}

impl From<LanguageEntry> for LanguageOption {
    fn from(entry: LanguageEntry) -> Self {
        match entry {
            LanguageEntry::Code(code) => LanguageOption {
                name: crate::view_state::language_label(&code).to_string(),
                code,
                native_name: None,
            },
            LanguageEntry::Full(option) => option,
        }
    }
}

impl ApiClient {
    pub async fn get_profile(&self) -> AppResult<UserProfile> {
        let response = self.get_raw("/api/user/profile").await?;
        decode_item(&response, "profile")
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> AppResult<UserProfile> {
        self.put_json("/api/user/profile", request).await
    }

    pub async fn supported_languages(&self) -> AppResult<Vec<LanguageOption>> {
        let response = self.get_raw("/api/user/languages").await?;
        let entries: Vec<LanguageEntry> = decode_list(&response, &["languages"])?;
        Ok(entries.into_iter().map(LanguageOption::from).collect())
    }
}
