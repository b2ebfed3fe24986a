//! Session-based authentication agent.
//!
//! # Design
//! The agent moves between Unauthenticated (no session), Authenticating (a
//! create-session call in flight) and Authenticated (session record held).
//! The record is restored from `SessionStorage` at construction and written
//! back as one batch after every handshake, so memory and storage always
//! agree on the three session keys.
//!
//! Unsafe requests trigger `ensure_authentication` before the CSRF header is
//! attached, so the first POST of a fresh client logs in on its own instead
//! of going out without a token. Concurrent handshakes are serialized by an
//! async lock: one create-session call is in flight at a time and waiters
//! reuse its result.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::agent::AuthenticationAgent;
use crate::error::{ClientError, Result};
use crate::http::HttpRequest;
use crate::storage::{self, SessionStorage, StoredSession};
use crate::types::{Credentials, Session, SessionCreateStruct};
use crate::user_service::{parse_session_body, UserService};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

const CREATE_SESSION_FAILED: &str = "Failed to create new session";

pub struct SessionAuthAgent {
    credentials: Credentials,
    storage: Arc<dyn SessionStorage>,
    user_service: RwLock<Option<Arc<dyn UserService>>>,
    session: RwLock<Option<Session>>,
    handshake: Mutex<()>,
}

impl SessionAuthAgent {
    /// Create an agent, restoring any session persisted in `storage`.
    ///
    /// A restored session is trusted as-is; it is not validated against the
    /// server. An incomplete record is ignored.
    pub fn new(credentials: Credentials, storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage::load_session(storage.as_ref()) {
            StoredSession::Complete(session) => {
                debug!(session_id = %session.id, "restored persisted session");
                Some(session)
            }
            StoredSession::Partial => {
                warn!("ignoring incomplete persisted session");
                None
            }
            StoredSession::Absent => None,
        };
        Self {
            credentials,
            storage,
            user_service: RwLock::new(None),
            session: RwLock::new(session),
            handshake: Mutex::new(()),
        }
    }

    pub fn with_user_service(self, service: Arc<dyn UserService>) -> Self {
        self.set_user_service(service);
        self
    }

    /// Inject (or replace) the user service used for session calls.
    pub fn set_user_service(&self, service: Arc<dyn UserService>) {
        *self.user_service.write() = Some(service);
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    fn user_service(&self) -> Result<Arc<dyn UserService>> {
        self.user_service.read().clone().ok_or(ClientError::NotInitialized)
    }

    async fn create_session(&self, service: &dyn UserService) -> Result<Session> {
        let input = service.new_session_create_struct(&self.credentials.login, &self.credentials.password);
        let response = service
            .create_session(&input)
            .await
            .map_err(|e| authentication_failed(&input, e))?;
        parse_session_body(&response.body).map_err(|e| authentication_failed(&input, e))
    }
}

fn authentication_failed(input: &SessionCreateStruct, cause: ClientError) -> ClientError {
    warn!(login = %input.login, error = %cause, "session handshake failed");
    ClientError::AuthenticationFailed {
        message: CREATE_SESSION_FAILED.to_string(),
        reason: cause.to_string(),
        context: input.clone(),
    }
}

#[async_trait]
impl AuthenticationAgent for SessionAuthAgent {
    async fn ensure_authentication(&self) -> Result<bool> {
        if self.is_authenticated() {
            return Ok(true);
        }
        let service = self.user_service()?;

        let _guard = self.handshake.lock().await;
        // Another caller may have finished the handshake while we waited.
        if self.is_authenticated() {
            return Ok(true);
        }

        let session = self.create_session(service.as_ref()).await?;
        info!(session_id = %session.id, "session created");
        let mut current = self.session.write();
        storage::save_session(self.storage.as_ref(), &session);
        *current = Some(session);
        Ok(true)
    }

    async fn authenticate_request(&self, mut request: HttpRequest) -> Result<HttpRequest> {
        if request.method.is_safe() {
            return Ok(request);
        }
        self.ensure_authentication().await?;
        let token = self
            .session
            .read()
            .as_ref()
            .map(|s| s.csrf_token.clone())
            .ok_or(ClientError::NotAuthenticated)?;
        request.set_header(CSRF_HEADER, token);
        Ok(request)
    }

    async fn log_out(&self) -> Result<bool> {
        let service = self.user_service()?;
        let session_id = self
            .session
            .read()
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        if let Err(e) = service.delete_session(&session_id).await {
            warn!(session_id = %session_id, error = %e, "session delete failed");
            return Err(ClientError::LogoutFailed {
                session_id,
                source: Box::new(e),
            });
        }

        let mut current = self.session.write();
        storage::clear_session(self.storage.as_ref());
        *current = None;
        info!(session_id = %session_id, "session deleted");
        Ok(true)
    }
}
