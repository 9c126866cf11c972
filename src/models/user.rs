use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string, deserialize_timestamp};

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id", alias = "uid", alias = "user_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub email: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default, alias = "language", alias = "preferred_language")]
    pub language_preference: Option<String>,
    #[serde(default, alias = "photo_url")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Display name, or the local part of the email when none is set.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(""),
        }
    }
}

/// One entry of `GET /api/user/languages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub native_name: Option<String>,
}

/// Body of `PUT /api/user/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_preference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_aliases() {
        let json = r#"{"uid": "abc", "email": "ada@example.com", "language": "fr"}"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "abc");
        assert_eq!(p.language_preference.as_deref(), Some("fr"));
        assert_eq!(p.greeting_name(), "ada");
    }

    #[test]
    fn test_greeting_prefers_display_name() {
        let json = r#"{"id": 1, "email": "x@y.z", "display_name": "Ada Lovelace"}"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.greeting_name(), "Ada Lovelace");
    }
}
