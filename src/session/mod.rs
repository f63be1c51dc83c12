//! # Session Guard
//!
//! Holds the bearer credential for the signed-in operator and builds the
//! headers for authenticated requests.
//!
//! A [`Session`] is constructed once at startup and shared (it is cheap to
//! clone). [`Session::bootstrap`] refuses to start without a stored
//! credential, which is the signal to send the operator to the login surface.
//! [`Session::login`] produces the credential; [`Session::logout`] and
//! [`Session::invalidate`] destroy it, locally and in the [`CredentialStore`].
//!
//! Logout is client-local; no request is made to the server.

mod error;
pub mod store;

pub use error::SessionError;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

use crate::framework::{AdminError, ApiRequest, AuthSource, Gateway, GatewayError};
use crate::model::Credential;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

/// Where the client should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Admin,
}

struct Inner {
    credential: RwLock<Option<Credential>>,
    store: Arc<dyn CredentialStore>,
}

/// The operator's session. Clones share the same credential slot.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl Session {
    /// A session with no credential yet, backed by `store`.
    pub fn anonymous(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_credential(store, None)
    }

    /// Restores the persisted credential.
    ///
    /// # Errors
    /// [`SessionError::LoginRequired`] if nothing is stored, or
    /// [`SessionError::Storage`] if the store cannot be read.
    pub fn bootstrap(store: Arc<dyn CredentialStore>) -> Result<Self, SessionError> {
        match store.load()? {
            Some(credential) => {
                info!(token = %credential.token_hint(), "Session restored");
                Ok(Self::with_credential(store, Some(credential)))
            }
            None => {
                info!("No stored credential, login required");
                Err(SessionError::LoginRequired)
            }
        }
    }

    fn with_credential(store: Arc<dyn CredentialStore>, credential: Option<Credential>) -> Self {
        Self {
            inner: Arc::new(Inner {
                credential: RwLock::new(credential),
                store,
            }),
        }
    }

    pub fn current_credential(&self) -> Option<Credential> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Where a freshly started client should go.
    pub fn route(&self) -> Route {
        if self.is_authenticated() {
            Route::Admin
        } else {
            Route::Login
        }
    }

    /// JSON content type plus `Authorization: Bearer <token>`.
    pub fn auth_headers(&self) -> Result<HeaderMap, SessionError> {
        let guard = self.read();
        let credential = guard.as_ref().ok_or(SessionError::LoginRequired)?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", credential.token))
            .map_err(|_| SessionError::InvalidToken)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Exchanges username and password for a credential at `/auth/login`.
    ///
    /// The credential is held by this session and persisted. A failure to
    /// persist is logged; the session still proceeds with the in-memory copy.
    #[instrument(skip(self, gateway, password))]
    pub async fn login(
        &self,
        gateway: &dyn Gateway,
        username: &str,
        password: &str,
    ) -> Result<Credential, AdminError> {
        let request = ApiRequest::post("/auth/login")
            .json(&LoginRequest { username, password })
            .map_err(|e| AdminError::LoginFailed(e.to_string()))?;

        let body = gateway.send(request).await.map_err(|e| {
            warn!(error = %e, "Login rejected");
            AdminError::LoginFailed(login_failure_message(&e))
        })?;

        let credential: Credential = serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "Login response has no usable token");
            AdminError::LoginFailed("Login failed".to_string())
        })?;

        if let Err(e) = self.inner.store.save(&credential) {
            warn!(error = %e, "Could not persist credential");
        }
        *self.write() = Some(credential.clone());
        info!(token = %credential.token_hint(), "Logged in");
        Ok(credential)
    }

    /// Drops the credential and its persisted copy.
    pub fn logout(&self) -> Route {
        self.clear();
        info!("Logged out");
        Route::Login
    }

    /// Drops the credential after the server refused it.
    pub fn invalidate(&self) {
        if self.is_authenticated() {
            warn!("Credential rejected by server, login required");
        }
        self.clear();
    }

    fn clear(&self) {
        *self.write() = None;
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Could not remove stored credential");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Credential>> {
        self.inner.credential.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Credential>> {
        self.inner.credential.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthSource for Session {
    fn auth_headers(&self) -> Option<HeaderMap> {
        match Session::auth_headers(self) {
            Ok(headers) => Some(headers),
            Err(e) => {
                debug!(error = %e, "No authorization headers");
                None
            }
        }
    }

    fn invalidate(&self) {
        Session::invalidate(self);
    }
}

fn login_failure_message(error: &GatewayError) -> String {
    match error {
        GatewayError::Transport(_) => "Server connection failed. Is the backend running?".to_string(),
        other => other
            .server_message()
            .unwrap_or("Login failed")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockGateway;
    use crate::framework::HttpGateway;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn memory() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::default())
    }

    #[test]
    fn bootstrap_without_credential_requires_login() {
        let result = Session::bootstrap(memory());
        assert!(matches!(result, Err(SessionError::LoginRequired)));
    }

    #[test]
    fn bootstrap_restores_stored_credential() {
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok-abc", "admin",
        )));
        let session = Session::bootstrap(store).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.route(), Route::Admin);
        assert_eq!(session.current_credential().unwrap().token, "tok-abc");
    }

    #[test]
    fn headers_carry_json_and_bearer() {
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok-abc", "admin",
        )));
        let session = Session::bootstrap(store).unwrap();
        let headers = session.auth_headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok-abc");
    }

    #[test]
    fn headers_fail_without_credential() {
        let session = Session::anonymous(memory());
        assert_eq!(session.auth_headers(), Err(SessionError::LoginRequired));
        assert!(AuthSource::auth_headers(&session).is_none());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "bad\ntoken", "admin",
        )));
        let session = Session::bootstrap(store).unwrap();
        assert_eq!(session.auth_headers(), Err(SessionError::InvalidToken));
    }

    #[test]
    fn logout_clears_memory_and_store() {
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok", "admin",
        )));
        let session = Session::bootstrap(store.clone()).unwrap();
        assert_eq!(session.logout(), Route::Login);
        assert!(session.current_credential().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn login_stores_and_persists_credential() {
        let mut mock = MockGateway::new();
        mock.expect_post("/auth/login")
            .return_ok(json!({ "token": "fresh-token", "username": "admin" }));
        let store = memory();
        let session = Session::anonymous(store.clone());

        let credential = session
            .login(mock.gateway().as_ref(), "admin", "hunter2")
            .await
            .unwrap();
        assert_eq!(credential.token, "fresh-token");
        assert!(session.is_authenticated());
        assert_eq!(store.load().unwrap(), Some(credential));

        let sent = &mock.requests()[0];
        assert!(!sent.auth_required);
        assert_eq!(sent.body, Some(json!({ "username": "admin", "password": "hunter2" })));
        mock.verify();
    }

    #[tokio::test]
    async fn login_failures_map_to_operator_messages() {
        let mut mock = MockGateway::new();
        mock.expect_post("/auth/login").return_status(401, Some("Invalid credentials"));
        mock.expect_post("/auth/login").return_status(500, None);
        mock.expect_post("/auth/login")
            .return_err(GatewayError::Transport("connection refused".into()));
        let gateway = mock.gateway();
        let session = Session::anonymous(memory());

        let messages: Vec<_> = [
            session.login(gateway.as_ref(), "admin", "x").await,
            session.login(gateway.as_ref(), "admin", "x").await,
            session.login(gateway.as_ref(), "admin", "x").await,
        ]
        .into_iter()
        .map(|r| r.unwrap_err().user_message())
        .collect();

        assert_eq!(
            messages,
            vec![
                "Invalid credentials",
                "Login failed",
                "Server connection failed. Is the backend running?",
            ]
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_never_logs_the_password() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let session = Session::anonymous(memory());
        let gateway = HttpGateway::new(
            "http://127.0.0.1:1/api",
            Duration::from_secs(2),
            Arc::new(session.clone()),
        )
        .unwrap();

        let err = session
            .login(&gateway, "admin", "hunter2-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::LoginFailed(_)));

        let output = logs.contents();
        assert!(output.contains("/auth/login"), "login request was not traced: {output}");
        assert!(!output.contains("hunter2-secret"));
    }
}
