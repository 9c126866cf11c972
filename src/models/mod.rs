//! Entity and response models mirroring the backend's JSON shapes.
//!
//! All records are server-owned. The client never derives persistent state
//! from them; view-state holders keep them only for the lifetime of a screen.

mod exam;
mod group;
mod job;
mod pdf;
mod subject;
mod submission;
mod user;

pub use exam::{
    AnswerPayload, Difficulty, Exam, ExamQuestion, ExamStatus, GenerateExamRequest,
    GenerateExamResponse, QuestionType, SubmitExamRequest, SubmitExamResponse,
};
pub use group::{CreateGroupRequest, Group, UpdateGroupRequest};
pub use job::{Job, JobKind, JobStatus};
pub use pdf::{DownloadUrlResponse, PdfDocument, PdfStatus};
pub use subject::{CreateSubjectRequest, Subject, UpdateSubjectRequest};
pub use submission::{GradingResult, GradingStatus, QuestionResult, SubmissionSummary};
pub use user::{LanguageOption, UpdateProfileRequest, UserProfile};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Optional variant of [`deserialize_id`]; null and missing become `None`.
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|opt| opt.map(|w| w.0))
}

/// Helper to deserialize nullable strings as empty string
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Lenient timestamp: RFC 3339, or a naive ISO timestamp taken as UTC.
/// Anything unparseable becomes `None` instead of failing the record.
pub(crate) fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        parent: Option<String>,
    }

    #[test]
    fn test_deserialize_id_string_or_int() {
        let a: IdHolder = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(a.id, "abc");
        assert_eq!(a.parent, None);

        let b: IdHolder = serde_json::from_str(r#"{"id": 42, "parent": 7}"#).unwrap();
        assert_eq!(b.id, "42");
        assert_eq!(b.parent.as_deref(), Some("7"));

        let c: IdHolder = serde_json::from_str(r#"{"id": 1, "parent": null}"#).unwrap();
        assert_eq!(c.parent, None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let rfc = parse_timestamp("2024-03-01T10:15:30Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let offset = parse_timestamp("2024-03-01T10:15:30+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let naive = parse_timestamp("2024-03-01T10:15:30.123456").unwrap();
        assert_eq!(naive.day(), 1);

        let spaced = parse_timestamp("2024-03-01 10:15:30").unwrap();
        assert_eq!(spaced.minute(), 15);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
