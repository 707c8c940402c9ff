//! Authenticated request gateway
//!
//! Wraps a shared `reqwest::Client`. Relative paths are resolved against
//! the configured base URL, the stored bearer credential is attached
//! unless the caller supplied its own `Authorization` header, and any
//! HTTP 401 clears the credential and broadcasts a logout so the session
//! store can react no matter which call tripped it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::api::error::ApiError;
use crate::config::ApiConfig;
use crate::session::credential::CredentialStore;

/// Process-wide session events broadcast by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The stored credential was rejected or discarded; listeners must
    /// treat the session as ended.
    LoggedOut,
}

/// One outbound request: method, path, and the options the caller cares
/// about. `auth` defaults to true.
pub struct ApiRequest {
    method: Method,
    path: String,
    auth: bool,
    body: Option<serde_json::Value>,
    form: Option<reqwest::multipart::Form>,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            auth: true,
            body: None,
            form: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Skip attaching the stored credential.
    pub fn no_auth(mut self) -> Self {
        self.auth = false;
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a multipart form. No explicit content-type is set; the
    /// client fills in the boundary.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.form = Some(form);
        self
    }

    /// Add a header. A caller-supplied `Authorization` header wins over
    /// the stored credential.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The authenticated request gateway.
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Gateway {
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            events,
        })
    }

    /// Subscribe to session events. Every subscriber sees the logout
    /// broadcast regardless of which request produced it.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Clone of the event sender, so the session store can broadcast an
    /// explicit logout on the same channel 401s use.
    pub fn events(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    fn resolve_url(&self, path: &str) -> String {
        let lower = path.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request and return the raw response.
    ///
    /// A 401 response clears the credential, broadcasts
    /// [`SessionEvent::LoggedOut`], and returns [`ApiError::Unauthorized`].
    /// Other statuses are returned to the caller untouched.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let url = self.resolve_url(&request.path);
        tracing::debug!(method = %request.method, %url, auth = request.auth, "sending request");

        let mut builder = self.http.request(request.method, &url);
        let mut caller_set_auth = false;
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("authorization") {
                caller_set_auth = true;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.auth && !caller_set_auth {
            if let Some(token) = self.credentials.load() {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }
        if let Some(form) = request.form {
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.force_logout();
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    /// Send a request and decode a JSON body, mapping non-success
    /// statuses into the error taxonomy.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = Self::check_status(self.send(request).await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a request, discarding any success body.
    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        Self::check_status(self.send(request).await?).await?;
        Ok(())
    }

    /// Serialize a body for [`ApiRequest::json`].
    pub fn to_body<T: Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
        Ok(serde_json::to_value(body)?)
    }

    /// Clear the credential and notify listeners. Idempotent; concurrent
    /// 401s may land here several times and each clear is harmless.
    fn force_logout(&self) {
        tracing::warn!("server returned 401, clearing stored credential");
        self.credentials.clear();
        // send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = extract_error_message(response).await;
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        if status == StatusCode::CONFLICT {
            Err(ApiError::Conflict(message))
        } else {
            Err(ApiError::Status { status: status.as_u16(), message })
        }
    }
}

/// Pull a human-readable message out of an error body. The backend sends
/// `{ "error": "..." }` or `{ "message": "..." }`; fall back to raw text.
async fn extract_error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["error", "message"] {
            if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    text
}
