//! Verdent HTTP Client implementation

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ClientConfig, Endpoints};
use crate::error::{Result, VerdentClientError};
use crate::types::*;

const PKCE_CALLBACK_PATH: &str = "/passport/pkce/callback";
const PKCE_AUTH_PATH: &str = "/passport/pkce/auth";
const PASSWORD_LOGIN_PATH: &str = "/passport/login";
const USER_INFO_PATH: &str = "/user/center/info";
const INPUT_BOX_INFO_PATH: &str = "/input_box/info";
const UPLOAD_FILE_PATH: &str = "/user/center/upload_file";
const FEEDBACK_PATH: &str = "/user/center/feedback";

/// Verdent API client
///
/// Holds the derived endpoints, one shared HTTP connection pool and the
/// session token. All operations take `&self`, so a client can be shared
/// behind an `Arc` and used from several tasks at once. Each request reads
/// the token when it is issued; a [`set_token`](Self::set_token) takes
/// effect for every request started afterwards.
pub struct VerdentClient {
    client: Client,
    endpoints: Endpoints,
    timeout: Duration,
    token: RwLock<Option<String>>,
}

impl VerdentClient {
    /// Create a client for the production service
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder().timeout(timeout).build()?;
        let endpoints = config.endpoints();

        Ok(Self {
            client,
            endpoints,
            timeout,
            token: RwLock::new(config.token),
        })
    }

    // =========================================================================
    // Endpoints & Session
    // =========================================================================

    /// All derived base URLs
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Agent API base URL
    pub fn base_url(&self) -> &str {
        &self.endpoints.base
    }

    /// Passport API base URL
    pub fn login_url(&self) -> &str {
        &self.endpoints.login
    }

    /// Log API base URL
    pub fn log_url(&self) -> &str {
        &self.endpoints.log
    }

    /// Request timeout applied to every call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replace the session token
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Current session token
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Auth headers for the current token
    ///
    /// Empty when no token is set, otherwise a single
    /// `Cookie: token=<token>` entry.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        if let Some(token) = self.token.read().as_deref().filter(|t| !t.is_empty()) {
            headers.insert("Cookie".to_string(), format!("token={}", token));
        }
        headers
    }

    /// WebSocket chat URL, e.g. `wss://agent.verdent.ai/chat`
    pub fn websocket_url(&self) -> &str {
        &self.endpoints.ws
    }

    /// Headers to present when opening the chat WebSocket
    pub fn websocket_headers(&self) -> BTreeMap<String, String> {
        self.headers()
    }

    /// Build a transport bound to `base_url` (default: the agent API)
    ///
    /// The auth headers are captured now. A transport built before a token
    /// change keeps sending the old token.
    pub fn transport(&self, base_url: Option<&str>) -> Result<Transport> {
        let base_url = Url::parse(base_url.unwrap_or(self.endpoints.base.as_str()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in self.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| VerdentClientError::InvalidHeader(e.to_string()))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| VerdentClientError::InvalidHeader(format!("token: {}", e)))?;
            headers.insert(name, value);
        }

        Ok(Transport {
            client: self.client.clone(),
            base_url,
            headers,
        })
    }

    // =========================================================================
    // Auth Operations
    // =========================================================================

    /// Exchange a PKCE authorization code for a session token
    ///
    /// On success the token is stored on the client and returned.
    #[instrument(skip(self, code, code_verifier))]
    pub async fn login(&self, code: &str, code_verifier: &str) -> Result<String> {
        self.exchange_code(code, code_verifier)
            .await
            .inspect_err(|e| warn!("Login failed: {}", e))
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<String> {
        let transport = self.transport(Some(self.endpoints.login.as_str()))?;
        let body = PkceCallbackRequest {
            code,
            code_verifier,
        };

        let response = transport.post(PKCE_CALLBACK_PATH)?.json(&body).send().await?;
        let data: Option<Value> = self.handle_envelope(response).await?;

        let token = data_str(data.as_ref(), "token")
            .ok_or_else(|| VerdentClientError::response_shape("token not found in response"))?;

        self.set_token(token.clone());
        Ok(token)
    }

    /// Request a PKCE authorization code for the current session
    ///
    /// Together with [`login`](Self::login) this trades an existing token
    /// for a fresh one.
    #[instrument(skip(self))]
    pub async fn request_auth_code(&self, code_challenge: &str) -> Result<String> {
        self.auth_code(code_challenge)
            .await
            .inspect_err(|e| warn!("Failed to request auth code: {}", e))
    }

    async fn auth_code(&self, code_challenge: &str) -> Result<String> {
        let transport = self.transport(Some(self.endpoints.login.as_str()))?;
        let body = PkceAuthRequest { code_challenge };

        let response = transport.post(PKCE_AUTH_PATH)?.json(&body).send().await?;
        let data: Option<Value> = self.handle_envelope(response).await?;

        data_str(data.as_ref(), "code")
            .ok_or_else(|| VerdentClientError::response_shape("auth code not found in response"))
    }

    /// Log in with email and password
    ///
    /// On success the session token is stored on the client.
    #[instrument(skip(self, password))]
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<LoginData> {
        self.password_login(email, password)
            .await
            .inspect_err(|e| warn!("Password login failed: {}", e))
    }

    async fn password_login(&self, email: &str, password: &str) -> Result<LoginData> {
        let transport = self.transport(Some(self.endpoints.login.as_str()))?;
        let body = PasswordLoginRequest { email, password };

        let response = transport.post(PASSWORD_LOGIN_PATH)?.json(&body).send().await?;
        let data: Option<Value> = self.handle_envelope(response).await?;

        let data = data
            .filter(|d| data_str(Some(d), "token").is_some())
            .and_then(|d| serde_json::from_value::<LoginData>(d).ok())
            .ok_or_else(|| VerdentClientError::response_shape("login data not found in response"))?;

        self.set_token(data.token.clone());
        Ok(data)
    }

    // =========================================================================
    // User Center
    // =========================================================================

    /// Fetch the user profile
    ///
    /// A response without `data` yields an empty profile.
    #[instrument(skip(self))]
    pub async fn fetch_user_info(&self) -> Result<UserInfo> {
        self.user_info()
            .await
            .inspect_err(|e| warn!("Failed to fetch user info: {}", e))
    }

    async fn user_info(&self) -> Result<UserInfo> {
        let transport = self.transport(None)?;
        let response = transport.get(USER_INFO_PATH)?.send().await?;
        let data: Option<UserInfo> = self.handle_envelope(response).await?;
        Ok(data.unwrap_or_default())
    }

    /// Remaining credits, derived from the user profile
    #[instrument(skip(self))]
    pub async fn get_user_credits(&self) -> Result<Credits> {
        self.user_info()
            .await
            .map(|info| info.credits())
            .inspect_err(|e| warn!("Failed to get user credits: {}", e))
    }

    /// Account email, `None` if the profile has none
    #[instrument(skip(self))]
    pub async fn get_user_email(&self) -> Result<Option<String>> {
        self.user_info()
            .await
            .map(|info| info.email)
            .inspect_err(|e| warn!("Failed to get user email: {}", e))
    }

    /// Upload a file as multipart field `file`
    #[instrument(skip(self, file_data))]
    pub async fn upload_file(
        &self,
        file_data: impl Into<Vec<u8>>,
        filename: &str,
    ) -> Result<Value> {
        let part = Part::bytes(file_data.into()).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        self.post_data(UPLOAD_FILE_PATH, |req| req.multipart(form))
            .await
            .inspect_err(|e| warn!("Failed to upload file: {}", e))
    }

    /// Submit user feedback as a JSON body
    #[instrument(skip(self, feedback))]
    pub async fn submit_feedback<F: Serialize + ?Sized>(
        &self,
        feedback: &F,
    ) -> Result<Value> {
        self.post_data(FEEDBACK_PATH, |req| req.json(feedback))
            .await
            .inspect_err(|e| warn!("Failed to submit feedback: {}", e))
    }

    // =========================================================================
    // Input Box
    // =========================================================================

    /// Fetch input box metadata for a client version
    #[instrument(skip(self))]
    pub async fn get_input_box_info(&self, version: &str) -> Result<Value> {
        self.input_box_info(version)
            .await
            .inspect_err(|e| warn!("Failed to get input box info: {}", e))
    }

    async fn input_box_info(&self, version: &str) -> Result<Value> {
        let transport = self.transport(None)?;
        let response = transport
            .get(INPUT_BOX_INFO_PATH)?
            .query(&[("version", version)])
            .send()
            .await?;
        let data = self.handle_envelope(response).await?;
        Ok(data.unwrap_or_default())
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    async fn post_data(
        &self,
        path: &str,
        body: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value> {
        let transport = self.transport(None)?;
        let response = body(transport.post(path)?).send().await?;
        let data = self.handle_envelope(response).await?;
        Ok(data.unwrap_or_default())
    }

    /// Check status, decode the envelope and return its `data`
    async fn handle_envelope<T: DeserializeOwned>(&self, response: Response) -> Result<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.extract_error(response).await);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| VerdentClientError::ParseError(e.to_string()))?;

        match envelope.err_code {
            Some(code) if code != 0 => Err(VerdentClientError::ApiError {
                code,
                message: envelope.err_msg.unwrap_or_default(),
            }),
            _ => Ok(envelope.data),
        }
    }

    /// Extract error from failed response
    async fn extract_error(&self, response: Response) -> VerdentClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Prefer the envelope's errMsg, then the raw body
        let message = serde_json::from_str::<Envelope<Value>>(&body)
            .ok()
            .and_then(|e| e.err_msg)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body
                }
            });

        VerdentClientError::server_error(status.as_u16(), message)
    }
}

/// Non-empty string field of an envelope's `data`, if `data` is an object
fn data_str(data: Option<&Value>, field: &str) -> Option<String> {
    data.and_then(|d| d.get(field))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl fmt::Debug for VerdentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerdentClient")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("has_token", &self.token.read().is_some())
            .finish()
    }
}

/// Pre-configured HTTP transport
///
/// Bound to one base URL with the auth headers that were current when it
/// was created. Shares the client's connection pool and timeout.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl Transport {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers attached to every request from this transport
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Resolve `path` against the base URL, keeping any base path prefix
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        Ok(self.client.get(url).headers(self.headers.clone()))
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        Ok(self.client.post(url).headers(self.headers.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::COOKIE;

    fn client_for(host: &str, port: u16) -> VerdentClient {
        let config = ClientConfig::builder().host(host).port(port).build();
        VerdentClient::with_config(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = VerdentClient::new().unwrap();
        assert_eq!(client.base_url(), "https://agent.verdent.ai");
        assert_eq!(client.login_url(), "https://login.verdent.ai");
        assert_eq!(client.log_url(), "https://log.verdent.ai");
        assert_eq!(client.websocket_url(), "wss://agent.verdent.ai/chat");
        assert_eq!(client.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_custom_host_and_port() {
        let client = client_for("x.test", 8080);
        assert_eq!(client.base_url(), "http://x.test:8080");
        assert_eq!(client.websocket_url(), "ws://x.test:8080/chat");
    }

    #[test]
    fn test_zero_port_and_timeout_fall_back_to_defaults() {
        let config = ClientConfig::builder().host("").port(0).timeout_ms(0).build();
        let client = VerdentClient::with_config(config).unwrap();
        assert_eq!(client.base_url(), "https://agent.verdent.ai");
        assert_eq!(client.websocket_url(), "wss://agent.verdent.ai/chat");
        assert_eq!(client.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_headers_follow_token() {
        let client = VerdentClient::new().unwrap();
        assert!(client.headers().is_empty());

        client.set_token("X");
        let headers = client.headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Cookie").map(String::as_str), Some("token=X"));
        assert_eq!(client.websocket_headers(), headers);
    }

    #[test]
    fn test_empty_token_sends_no_cookie() {
        let config = ClientConfig::builder().token("").build();
        let client = VerdentClient::with_config(config).unwrap();
        assert!(client.headers().is_empty());
    }

    #[test]
    fn test_token_from_config() {
        let config = ClientConfig::builder().token("seed").build();
        let client = VerdentClient::with_config(config).unwrap();
        assert_eq!(client.token().as_deref(), Some("seed"));
    }

    #[test]
    fn test_transport_captures_token_at_call_time() {
        let client = VerdentClient::new().unwrap();
        client.set_token("A");
        let before = client.transport(None).unwrap();

        client.set_token("B");
        let after = client.transport(None).unwrap();

        assert_eq!(before.headers().get(COOKIE).unwrap(), "token=A");
        assert_eq!(after.headers().get(COOKIE).unwrap(), "token=B");
    }

    #[test]
    fn test_transport_without_token_has_no_headers() {
        let client = VerdentClient::new().unwrap();
        let transport = client.transport(None).unwrap();
        assert!(transport.headers().is_empty());
        assert!(transport.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_transport_base_override() {
        let client = VerdentClient::new().unwrap();
        let transport = client.transport(Some(client.login_url())).unwrap();
        assert_eq!(
            transport.url(PKCE_CALLBACK_PATH).unwrap().as_str(),
            "https://login.verdent.ai/passport/pkce/callback"
        );
    }

    #[test]
    fn test_transport_keeps_base_prefix() {
        let client = VerdentClient::new().unwrap();
        let transport = client.transport(Some("http://localhost:9000/api/")).unwrap();
        assert_eq!(
            transport.url("/user/center/info").unwrap().as_str(),
            "http://localhost:9000/api/user/center/info"
        );
    }

    #[test]
    fn test_malformed_host_fails_at_request_time() {
        let client = client_for("not a host", 443);
        assert_eq!(client.base_url(), "https://not a host");
        let err = client.transport(None).unwrap_err();
        assert!(matches!(err, VerdentClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_token_with_newline_is_rejected_by_transport() {
        let client = VerdentClient::new().unwrap();
        client.set_token("bad\ntoken");
        let err = client.transport(None).unwrap_err();
        assert!(matches!(err, VerdentClientError::InvalidHeader(_)));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VerdentClient>();
        assert_send_sync::<Transport>();
    }

    #[test]
    fn test_debug_hides_token() {
        let client = VerdentClient::new().unwrap();
        client.set_token("secret-value");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("has_token: true"));
    }
}
