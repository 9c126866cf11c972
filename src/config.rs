//! Client configuration.
//!
//! Built with the `with_*` builder methods or read from `EXAMPREP_*`
//! environment variables.

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::adapters::ReqwestHttpClient;
use crate::error::{AppResult, NetworkError};
use crate::traits::HttpClient;

/// Default backend URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default job polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

pub const ENV_API_URL: &str = "EXAMPREP_API_URL";
pub const ENV_IDENTITY_URL: &str = "EXAMPREP_IDENTITY_URL";
pub const ENV_IDENTITY_KEY: &str = "EXAMPREP_IDENTITY_KEY";
pub const ENV_TIMEOUT_SECS: &str = "EXAMPREP_TIMEOUT_SECS";
pub const ENV_POLL_SECS: &str = "EXAMPREP_POLL_SECS";
pub const ENV_LOG: &str = "EXAMPREP_LOG";
pub const ENV_LOG_JSON: &str = "EXAMPREP_LOG_JSON";

/// Configuration shared by the API client, the identity provider and the
/// job poller.
///
/// # Example
///
/// ```ignore
/// use examprep::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_base_url("https://exams.example.com")
///     .with_poll_interval(std::time::Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Exam backend base URL, without trailing slash
    pub api_base_url: String,
    /// Identity service base URL (None: the hosted default)
    pub identity_base_url: Option<String>,
    /// Identity service API key
    pub identity_api_key: Option<String>,
    /// Overall request timeout (None: HTTP client default)
    pub request_timeout: Option<Duration>,
    /// Fixed interval between job status polls
    pub poll_interval: Duration,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            identity_base_url: None,
            identity_api_key: None,
            request_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_identity_base_url(mut self, url: impl Into<String>) -> Self {
        self.identity_base_url = Some(url.into());
        self
    }

    pub fn with_identity_api_key(mut self, key: impl Into<String>) -> Self {
        self.identity_api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Read configuration from `EXAMPREP_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numbers keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config = config.with_api_base_url(url.trim());
        }
        if let Some(url) = get(ENV_IDENTITY_URL) {
            config = config.with_identity_base_url(url.trim());
        }
        if let Some(key) = get(ENV_IDENTITY_KEY) {
            config = config.with_identity_api_key(key.trim());
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            match parse_secs(&raw) {
                Some(timeout) => config = config.with_request_timeout(timeout),
                None => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }
        if let Some(raw) = get(ENV_POLL_SECS) {
            match parse_secs(&raw) {
                Some(interval) => config = config.with_poll_interval(interval),
                None => warn!("Ignoring invalid {}={:?}", ENV_POLL_SECS, raw),
            }
        }
        if let Some(level) = get(ENV_LOG) {
            config = config.with_log_level(level.trim());
        }
        if let Some(raw) = get(ENV_LOG_JSON) {
            config = config.with_json_logs(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }
        config
    }

    /// Build the production HTTP client for this configuration.
    pub fn build_http_client(&self) -> AppResult<Arc<dyn HttpClient>> {
        let client = match self.request_timeout {
            Some(timeout) => ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
                NetworkError::Other {
                    message: e.to_string(),
                }
            })?,
            None => ReqwestHttpClient::new(),
        };
        Ok(Arc::new(client))
    }
}

/// Positive whole or fractional seconds.
fn parse_secs(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    if secs.is_finite() && secs > 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}
