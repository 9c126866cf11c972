use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string, deserialize_optional_id, deserialize_timestamp};

/// Processing state of an uploaded PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PdfStatus {
    #[serde(alias = "uploaded")]
    Uploading,
    Processing,
    #[default]
    #[serde(alias = "processed", alias = "completed")]
    Ready,
    Failed,
    #[serde(other)]
    Unknown,
}

/// An uploaded source document. Immutable once uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfDocument {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub subject_id: Option<String>,
    #[serde(
        default,
        alias = "file_name",
        alias = "original_filename",
        deserialize_with = "deserialize_nullable_string"
    )]
    pub filename: String,
    #[serde(default, alias = "file_url", alias = "storage_url")]
    pub url: Option<String>,
    #[serde(default, alias = "file_size", alias = "size_bytes")]
    pub size: u64,
    #[serde(default, alias = "upload_date", deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PdfStatus,
}

impl PdfDocument {
    /// Size rendered for a list row: `"512 B"`, `"1.4 KB"`, `"2.0 MB"`.
    pub fn size_label(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        let size = self.size as f64;
        if size >= MB {
            format!("{:.1} MB", size / MB)
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} B", self.size)
        }
    }
}

/// Response of the download-url endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadUrlResponse {
    #[serde(alias = "download_url", alias = "signed_url")]
    pub url: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
