//! # Remote Resource Gateway
//!
//! A thin HTTP wrapper that turns controller intents ([`ApiRequest`]) into
//! requests against the API and reports failures uniformly as [`GatewayError`].
//!
//! Every call is attempted exactly once. There are no retries; the only bound
//! on a call is the client timeout, which surfaces as [`GatewayError::Transport`].

use crate::framework::error::GatewayError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One request against the API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub auth_required: bool,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            auth_required: false,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Marks the request as needing the bearer credential.
    pub fn authenticated(mut self) -> Self {
        self.auth_required = true;
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body).map_err(|e| GatewayError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Anything able to carry an [`ApiRequest`] to the API and hand back decoded JSON.
///
/// The production implementation is [`HttpGateway`]; tests use
/// [`MockGateway`](crate::framework::mock::MockGateway).
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError>;
}

/// Source of authorization headers for authenticated requests.
///
/// Implemented by the [`Session`](crate::session::Session) guard.
pub trait AuthSource: Send + Sync {
    /// `None` when there is no credential; the request must not be sent.
    fn auth_headers(&self) -> Option<HeaderMap>;

    /// Called when the server rejects the credential (401/403).
    fn invalidate(&self);
}

/// reqwest-backed gateway rooted at the API base URL.
#[derive(Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthSource>,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth: Arc<dyn AuthSource>,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portfolio-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let mut builder = self
            .http
            .request(request.method.into(), self.url(&request.path))
            .header(CONTENT_TYPE, "application/json");

        if request.auth_required {
            let headers = self.auth.auth_headers().ok_or_else(|| {
                warn!("No credential for authenticated request");
                GatewayError::Unauthenticated
            })?;
            builder = builder.headers(headers);
        }
        // Bodies are not logged here; the login body carries the password.
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        debug!(has_body = request.body.is_some(), "Sending request");

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = error_message(&text)
                .or_else(|| status.canonical_reason().map(str::to_owned));
            let err = GatewayError::HttpStatus {
                status: status.as_u16(),
                message,
            };
            warn!(status = status.as_u16(), error = %err, "Request rejected");
            if request.auth_required && err.is_auth_rejection() {
                self.auth.invalidate();
            }
            return Err(err);
        }

        debug!(status = status.as_u16(), "Response ok");
        decode_body(&text)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport("request timed out".to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Pulls `message` out of an error body like `{"message": "..."}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

/// An empty 2xx body (e.g. 204 on delete) decodes to `null`.
pub(crate) fn decode_body(body: &str) -> Result<Value, GatewayError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}
