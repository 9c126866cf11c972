//! Identity-toolkit REST provider.
//!
//! Talks to an identity-toolkit compatible service (email/password accounts,
//! Google id-token exchange, secure-token refresh). The service and its API
//! key are external collaborators; this adapter only maps their JSON and
//! error codes onto [`IdentitySession`] and [`AuthError`].

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::traits::{Headers, HttpClient, IdentityProvider, IdentitySession, Response};

/// Default base URL of the accounts API.
pub const IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com";

/// Default base URL of the secure-token (refresh) API.
pub const TOKEN_API_URL: &str = "https://securetoken.googleapis.com";

/// Response of the `accounts:*` sign-in endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds, sent as a string
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Response of the secure-token refresh endpoint (snake_case on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// JWT claims needed by the client.
#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

fn decode_claims(token: &str) -> Option<JwtClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    let payload = URL_SAFE_NO_PAD.decode(parts.get(1)?).ok()?;
    serde_json::from_slice(&payload).ok()
}

/// Extract the expiry instant from a JWT id token.
///
/// Returns `None` when the token is not a JWT or carries no `exp` claim.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token)?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Build a session from a bare token, using its claims where present.
pub fn session_from_token(token: &str) -> IdentitySession {
    let claims = decode_claims(token);
    let user_id = claims
        .as_ref()
        .and_then(|c| c.user_id.clone().or_else(|| c.sub.clone()))
        .unwrap_or_default();
    let email = claims
        .as_ref()
        .and_then(|c| c.email.clone())
        .unwrap_or_default();
    IdentitySession {
        user_id,
        email,
        display_name: None,
        id_token: token.to_string(),
        refresh_token: None,
        expires_at: jwt_expiry(token),
    }
}

fn expires_at(expires_in: Option<&str>, token: &str) -> Option<DateTime<Utc>> {
    expires_in
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .map(|secs| Utc::now() + Duration::seconds(secs))
        .or_else(|| jwt_expiry(token))
}

/// REST client for the identity provider.
pub struct RestIdentityProvider {
    http: Arc<dyn HttpClient>,
    api_key: String,
    identity_base_url: String,
    token_base_url: String,
}

impl RestIdentityProvider {
    /// Create a provider against the default hosted endpoints.
    pub fn new(http: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            identity_base_url: IDENTITY_API_URL.to_string(),
            token_base_url: TOKEN_API_URL.to_string(),
        }
    }

    /// Point both APIs at one base URL (emulator or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.identity_base_url = base_url.clone();
        self.token_base_url = base_url;
        self
    }

    fn accounts_url(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.identity_base_url,
            action,
            urlencoding::encode(&self.api_key)
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/v1/token?key={}",
            self.token_base_url,
            urlencoding::encode(&self.api_key)
        )
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// POST a JSON body and map transport and provider errors.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Response, AuthError> {
        let response = self
            .http
            .post(url, &body.to_string(), &Self::json_headers())
            .await
            .map_err(|e| {
                warn!("Identity provider unreachable: {}", e);
                AuthError::network(e.to_string())
            })?;
        Self::check(response)
    }

    fn check(response: Response) -> Result<Response, AuthError> {
        if response.is_success() {
            return Ok(response);
        }
        let code = response
            .json::<ErrorEnvelope>()
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP_{}", response.status));
        debug!("Identity provider rejected request: {}", code);
        Err(AuthError::from_provider_code(&code))
    }

    fn parse<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, AuthError> {
        response.json().map_err(|e| AuthError::Provider {
            code: "INVALID_RESPONSE".to_string(),
            message: e.to_string(),
        })
    }

    fn into_session(data: SignInResponse, fallback_email: &str) -> IdentitySession {
        let expires_at = expires_at(data.expires_in.as_deref(), &data.id_token);
        IdentitySession {
            user_id: data.local_id,
            email: data.email.unwrap_or_else(|| fallback_email.to_string()),
            display_name: data.display_name.filter(|n| !n.is_empty()),
            id_token: data.id_token,
            refresh_token: data.refresh_token,
            expires_at,
        }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response = self
            .post_json(&self.accounts_url("signInWithPassword"), &body)
            .await?;
        let data: SignInResponse = Self::parse(&response)?;
        Ok(Self::into_session(data, email))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IdentitySession, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response = self.post_json(&self.accounts_url("signUp"), &body).await?;
        let data: SignInResponse = Self::parse(&response)?;
        let mut session = Self::into_session(data, email);

        if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
            let body = serde_json::json!({
                "idToken": session.id_token,
                "displayName": name,
                "returnSecureToken": false,
            });
            // The account exists at this point; a failed profile update only
            // loses the display name.
            match self.post_json(&self.accounts_url("update"), &body).await {
                Ok(_) => session.display_name = Some(name.to_string()),
                Err(e) => warn!("Failed to set display name after sign-up: {}", e),
            }
        }
        Ok(session)
    }

    async fn sign_in_with_google(&self, google_id_token: &str) -> Result<IdentitySession, AuthError> {
        if google_id_token.is_empty() {
            return Err(AuthError::GoogleSignInCancelled);
        }
        let body = serde_json::json!({
            "postBody": format!(
                "id_token={}&providerId=google.com",
                urlencoding::encode(google_id_token)
            ),
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });
        let response = self
            .post_json(&self.accounts_url("signInWithIdp"), &body)
            .await?;
        let data: SignInResponse = Self::parse(&response)?;
        Ok(Self::into_session(data, ""))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AuthError> {
        let body = format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(refresh_token)
        );
        let mut headers = Headers::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        let response = self
            .http
            .post(&self.token_url(), &body, &headers)
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;
        let response = Self::check(response).map_err(|e| match e {
            refresh @ AuthError::RefreshFailed { .. } => refresh,
            other => AuthError::RefreshFailed {
                message: other.to_string(),
            },
        })?;
        let data: RefreshResponse = Self::parse(&response)?;

        let mut session = session_from_token(&data.id_token);
        if let Some(user_id) = data.user_id {
            session.user_id = user_id;
        }
        session.expires_at = expires_at(data.expires_in.as_deref(), &data.id_token);
        session.refresh_token = data.refresh_token.or_else(|| Some(refresh_token.to_string()));
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        self.post_json(&self.accounts_url("sendOobCode"), &body)
            .await
            .map(|_| ())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // Id tokens are stateless; dropping them locally is the sign-out.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};

    fn make_jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{}.{}.signature", header, payload)
    }

    fn provider(mock: &MockHttpClient) -> RestIdentityProvider {
        RestIdentityProvider::new(Arc::new(mock.clone()), "test-key").with_base_url("http://idp")
    }

    #[test]
    fn test_jwt_expiry() {
        let token = make_jwt(serde_json::json!({"exp": 1_700_000_000, "sub": "u1"}));
        let expiry = jwt_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
        assert!(jwt_expiry("not-a-jwt").is_none());
        assert!(jwt_expiry("a.!!!.c").is_none());
    }

    #[test]
    fn test_session_from_token_reads_claims() {
        let token = make_jwt(serde_json::json!({
            "exp": 4_000_000_000i64,
            "user_id": "u9",
            "email": "ada@example.com"
        }));
        let session = session_from_token(&token);
        assert_eq!(session.user_id, "u9");
        assert_eq!(session.email, "ada@example.com");
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_sign_in_maps_response() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://idp/v1/accounts:signInWithPassword",
            MockResponse::json(
                200,
                &serde_json::json!({
                    "localId": "u1",
                    "email": "ada@example.com",
                    "displayName": "",
                    "idToken": "tok",
                    "refreshToken": "ref",
                    "expiresIn": "3600"
                }),
            ),
        );

        let session = provider(&mock)
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap();

        assert_eq!(session.user_id, "u1");
        assert_eq!(session.id_token, "tok");
        assert!(session.display_name.is_none());
        assert!(session.expires_at.unwrap() > Utc::now());

        let requests = mock.get_requests();
        assert_eq!(
            requests[0].url,
            "http://idp/v1/accounts:signInWithPassword?key=test-key"
        );
        let body = requests[0].json_body().unwrap();
        assert_eq!(body["returnSecureToken"], true);
    }

    #[tokio::test]
    async fn test_sign_in_maps_provider_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(
            400,
            &serde_json::json!({"error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}}),
        ));

        let result = provider(&mock)
            .sign_in_with_password("ada@example.com", "secret1")
            .await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_provider_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(
            crate::traits::HttpError::ConnectionFailed("refused".to_string()),
        ));

        let err = provider(&mock)
            .send_password_reset("ada@example.com")
            .await
            .unwrap_err();
        assert!(err.user_message().contains("Unable to reach"));
    }

    #[tokio::test]
    async fn test_sign_up_sets_display_name() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://idp/v1/accounts:signUp",
            MockResponse::json(
                200,
                &serde_json::json!({"localId": "u2", "idToken": "tok2", "refreshToken": "r2"}),
            ),
        );
        mock.set_response("http://idp/v1/accounts:update", MockResponse::json(200, &serde_json::json!({})));

        let session = provider(&mock)
            .sign_up("new@example.com", "secret1", Some("New User"))
            .await
            .unwrap();

        assert_eq!(session.email, "new@example.com");
        assert_eq!(session.display_name.as_deref(), Some("New User"));
        assert_eq!(mock.get_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_uses_form_body() {
        let mock = MockHttpClient::new();
        let token = make_jwt(serde_json::json!({"exp": 4_000_000_000i64, "sub": "u1"}));
        mock.set_response(
            "http://idp/v1/token",
            MockResponse::json(
                200,
                &serde_json::json!({"id_token": token, "expires_in": "3600", "user_id": "u1"}),
            ),
        );

        let session = provider(&mock).refresh("old/refresh").await.unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.refresh_token.as_deref(), Some("old/refresh"));

        let request = &mock.get_requests()[0];
        assert_eq!(
            request.body.as_deref(),
            Some("grant_type=refresh_token&refresh_token=old%2Frefresh")
        );
    }

    #[tokio::test]
    async fn test_refresh_rejection_is_refresh_failed() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(
            400,
            &serde_json::json!({"error": {"message": "USER_NOT_FOUND"}}),
        ));
        let err = provider(&mock).refresh("r").await.unwrap_err();
        assert!(err.requires_reauth());
    }

    #[tokio::test]
    async fn test_empty_google_token_is_cancelled() {
        let mock = MockHttpClient::new();
        let err = provider(&mock).sign_in_with_google("").await.unwrap_err();
        assert_eq!(err, AuthError::GoogleSignInCancelled);
        assert!(mock.get_requests().is_empty());
    }
}
