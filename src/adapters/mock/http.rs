//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors for testing purposes. Responses can be keyed by URL
//! alone or by method and URL, queued for one-shot use, and delayed to
//! simulate a slow backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, MultipartUpload, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST and PUT requests)
    pub body: Option<String>,
    /// File part (for multipart requests)
    pub upload: Option<MultipartUpload>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
    /// Wait, then resolve the inner response
    Delayed(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// JSON response with the given status.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        MockResponse::Success(Response::json_body(status, value))
    }

    /// Empty response with the given status.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, bytes::Bytes::new()))
    }

    /// Delay this response.
    pub fn delayed(self, delay: Duration) -> Self {
        MockResponse::Delayed(delay, Box::new(self))
    }
}

#[derive(Debug)]
struct Rule {
    method: Option<String>,
    pattern: String,
    queued: VecDeque<MockResponse>,
    fixed: Option<MockResponse>,
}

impl Rule {
    fn matches(&self, method: &str, url: &str) -> bool {
        let method_ok = self
            .method
            .as_deref()
            .map_or(true, |m| m.eq_ignore_ascii_case(method));
        method_ok && url.starts_with(&self.pattern)
    }

    fn has_response(&self) -> bool {
        !self.queued.is_empty() || self.fixed.is_some()
    }

    /// Exact URL first, then longest prefix, then method-specific.
    fn rank(&self, url: &str) -> (bool, usize, bool) {
        (url == self.pattern, self.pattern.len(), self.method.is_some())
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use examprep::adapters::mock::{MockHttpClient, MockResponse};
/// use examprep::traits::{Headers, HttpClient};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://api.example.com/api/groups",
///     MockResponse::json(200, &serde_json::json!([])),
/// );
///
/// let response = client.get("https://api.example.com/api/groups", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses
    rules: Arc<Mutex<Vec<Rule>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL (exact or prefix), any method.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.set_rule(None, url, response);
    }

    /// Set a response for a method and URL (exact or prefix).
    pub fn set_method_response(&self, method: &str, url: &str, response: MockResponse) {
        self.set_rule(Some(method), url, response);
    }

    /// Queue a one-shot response for a method and URL. Queued responses are
    /// served in order before any fixed response for the same rule.
    pub fn push_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut rules = lock(&self.rules);
        match Self::find_rule(&mut rules, Some(method), url) {
            Some(rule) => rule.queued.push_back(response),
            None => rules.push(Rule {
                method: Some(method.to_uppercase()),
                pattern: url.to_string(),
                queued: VecDeque::from([response]),
                fixed: None,
            }),
        }
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Recorded requests with the given method whose URL starts with `url`.
    pub fn requests_to(&self, method: &str, url: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.url.starts_with(url))
            .cloned()
            .collect()
    }

    /// Number of requests with the given method to exactly `url`.
    pub fn count(&self, method: &str, url: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.url == url)
            .count()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        lock(&self.rules).clear();
    }

    fn find_rule<'a>(rules: &'a mut [Rule], method: Option<&str>, url: &str) -> Option<&'a mut Rule> {
        rules.iter_mut().find(|r| {
            r.pattern == url
                && match (&r.method, method) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => false,
                }
        })
    }

    fn set_rule(&self, method: Option<&str>, url: &str, response: MockResponse) {
        let mut rules = lock(&self.rules);
        match Self::find_rule(&mut rules, method, url) {
            Some(rule) => rule.fixed = Some(response),
            None => rules.push(Rule {
                method: method.map(str::to_uppercase),
                pattern: url.to_string(),
                queued: VecDeque::new(),
                fixed: Some(response),
            }),
        }
    }

    /// Record a request.
    fn record_request(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<String>,
        upload: Option<MultipartUpload>,
    ) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
            upload,
        });
    }

    /// Get the response for a request, consuming a queued one if present.
    fn take_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let mut rules = lock(&self.rules);
        let best = rules
            .iter_mut()
            .filter(|r| r.matches(method, url) && r.has_response())
            .max_by_key(|r| r.rank(url));

        if let Some(rule) = best {
            if let Some(response) = rule.queued.pop_front() {
                return Some(response);
            }
            return rule.fixed.clone();
        }
        drop(rules);

        lock(&self.default_response).clone()
    }

    async fn resolve(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        let mut response = self.take_response(method, url);
        loop {
            match response {
                Some(MockResponse::Success(r)) => return Ok(r),
                Some(MockResponse::Error(err)) => return Err(err),
                Some(MockResponse::Delayed(delay, inner)) => {
                    tokio::time::sleep(delay).await;
                    response = Some(*inner);
                }
                None => {
                    return Err(HttpError::Other(format!(
                        "No mock response for {} {}",
                        method, url
                    )))
                }
            }
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None, None);
        self.resolve("GET", url).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()), None);
        self.resolve("POST", url).await
    }

    async fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("PUT", url, headers, Some(body.to_string()), None);
        self.resolve("PUT", url).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("DELETE", url, headers, None, None);
        self.resolve("DELETE", url).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        upload: &MultipartUpload,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, None, Some(upload.clone()));
        self.resolve("POST", url).await
    }
}
