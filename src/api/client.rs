//! Authenticated JSON transport shared by every resource.
//!
//! Status interpretation, bearer headers and response decoding live here;
//! the per-resource files only know paths and payload types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::{classify_http_error, AppResult, AuthError, NetworkError};
use crate::traits::{Headers, HttpClient, MultipartUpload, Response};

/// Longest body excerpt kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Client for the exam backend REST API.
///
/// # Example
///
/// ```ignore
/// use examprep::api::ApiClient;
///
/// let api = ApiClient::new("https://exams.example.com", http, auth::global());
/// let groups = api.list_groups().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    auth: AuthContext,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>, auth: AuthContext) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            auth,
        }
    }

    /// Build a client with the reqwest transport described by `config`.
    pub fn from_config(config: &ClientConfig, auth: AuthContext) -> AppResult<Self> {
        Ok(Self::new(
            config.api_base_url.clone(),
            config.build_http_client()?,
            auth,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Headers for an authenticated call. Fails before any network traffic
    /// when nobody is signed in.
    fn auth_headers(&self) -> AppResult<Headers> {
        let token = self.auth.token().ok_or(AuthError::NotAuthenticated)?;
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert("Accept".to_string(), "application/json".to_string());
        Ok(headers)
    }

    fn json_headers(&self) -> AppResult<Headers> {
        let mut headers = self.auth_headers()?;
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Ok(headers)
    }

    /// Map a non-2xx response to a [`NetworkError`].
    fn check(response: Response, method: &str, url: &str) -> AppResult<Response> {
        if response.is_success() {
            return Ok(response);
        }
        let message = error_message(&response);
        let retry_after = response
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("retry-after"))
            .map(|(_, v)| v.as_str());
        warn!("{} {} failed with HTTP {}: {}", method, url, response.status, message);
        Err(NetworkError::from_status(response.status, message, retry_after).into())
    }

    pub(crate) async fn get_raw(&self, path: &str) -> AppResult<Response> {
        let url = self.url(path);
        let headers = self.auth_headers()?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url, &headers)
            .await
            .map_err(|e| classify_http_error(&e, &url))?;
        Self::check(response, "GET", &url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.get_raw(path).await?;
        decode(&response)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.post_raw(path, body).await?;
        decode(&response)
    }

    pub(crate) async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> AppResult<Response> {
        let url = self.url(path);
        let headers = self.json_headers()?;
        let body = serde_json::to_string(body)?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| classify_http_error(&e, &url))?;
        Self::check(response, "POST", &url)
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(path);
        let headers = self.json_headers()?;
        let body = serde_json::to_string(body)?;
        debug!("PUT {}", url);
        let response = self
            .http
            .put(&url, &body, &headers)
            .await
            .map_err(|e| classify_http_error(&e, &url))?;
        decode(&Self::check(response, "PUT", &url)?)
    }

    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        let url = self.url(path);
        let headers = self.auth_headers()?;
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url, &headers)
            .await
            .map_err(|e| classify_http_error(&e, &url))?;
        Self::check(response, "DELETE", &url)?;
        Ok(())
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        upload: &MultipartUpload,
    ) -> AppResult<Response> {
        let url = self.url(path);
        let headers = self.auth_headers()?;
        debug!("POST {} (multipart, {} bytes)", url, upload.data.len());
        let response = self
            .http
            .post_multipart(&url, upload, &headers)
            .await
            .map_err(|e| classify_http_error(&e, &url))?;
        Self::check(response, "POST", &url)
    }
}

/// Decode a JSON body.
pub(crate) fn decode<T: DeserializeOwned>(response: &Response) -> AppResult<T> {
    response.json().map_err(|e| {
        NetworkError::InvalidResponse {
            message: e.to_string(),
        }
        .into()
    })
}

/// Decode a list that may be a bare array or wrapped in an object under one
/// of `keys` (or the generic `items`/`data`/`results`).
pub(crate) fn decode_list<T: DeserializeOwned>(response: &Response, keys: &[&str]) -> AppResult<Vec<T>> {
    let value: serde_json::Value = decode(response)?;
    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => keys
            .iter()
            .chain(["items", "data", "results"].iter())
            .find_map(|key| match map.remove(*key) {
                Some(v @ serde_json::Value::Array(_)) => Some(v),
                _ => None,
            })
            .ok_or_else(|| NetworkError::InvalidResponse {
                message: format!("expected a list under one of {:?}", keys),
            })?,
        serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
        other => {
            return Err(NetworkError::InvalidResponse {
                message: format!("expected a list, got {}", other),
            }
            .into())
        }
    };
    Ok(serde_json::from_value(array)?)
}

/// Decode an object that may be wrapped as `{"<key>": {...}}`.
pub(crate) fn decode_item<T: DeserializeOwned>(response: &Response, key: &str) -> AppResult<T> {
    let value: serde_json::Value = decode(response)?;
    if let Some(inner) = value.get(key).filter(|v| v.is_object()) {
        if let Ok(item) = serde_json::from_value(inner.clone()) {
            return Ok(item);
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Best-effort message from an error body: `detail`, `error`, `message`,
/// else the raw text.
pub(crate) fn error_message(response: &Response) -> String {
    if let Ok(value) = response.json::<serde_json::Value>() {
        for key in ["detail", "error", "message"] {
            if let Some(message) = value.get(key).and_then(message_from_value) {
                return message;
            }
        }
    }
    let text = response.text().unwrap_or_default();
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn message_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        // FastAPI validation errors: [{"loc": [...], "msg": "..."}]
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string)
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        serde_json::Value::Object(_) => value.get("message").and_then(message_from_value),
        _ => None,
    }
}

/// Percent-encode one path segment.
pub(crate) fn seg(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
