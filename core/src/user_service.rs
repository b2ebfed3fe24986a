//! Session endpoints of the REST user service.
//!
//! # Design
//! `SessionRequests` is stateless: it builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network. `RestUserService`
//! pairs it with a `Connection` to implement the `UserService` seam the
//! session agent depends on. Session calls go straight to the connection,
//! never through the authentication agent, since they are what establishes
//! authentication in the first place.

use async_trait::async_trait;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseStatus};
use crate::types::{Session, SessionCreateStruct, SessionEnvelope, SessionInput, SessionInputEnvelope};

pub const SESSION_MEDIA_TYPE: &str = "application/vnd.ez.api.Session+json";
pub const SESSION_INPUT_MEDIA_TYPE: &str = "application/vnd.ez.api.SessionInput+json";

/// Session management operations the authentication agent relies on.
#[async_trait]
pub trait UserService: Send + Sync {
    fn new_session_create_struct(&self, login: &str, password: &str) -> SessionCreateStruct;

    /// Create a session. `Ok` carries the raw response, whose body holds the
    /// `Session` envelope.
    async fn create_session(&self, input: &SessionCreateStruct) -> Result<HttpResponse>;

    /// Delete the session identified by its href.
    async fn delete_session(&self, session_id: &str) -> Result<HttpResponse>;
}

/// Request builder and response parser for the session resource.
#[derive(Debug, Clone)]
pub struct SessionRequests {
    base_url: String,
    origin: String,
}

impl SessionRequests {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            origin: origin_of(&base_url).to_string(),
            base_url,
        }
    }

    pub fn build_create_session(&self, input: &SessionCreateStruct) -> Result<HttpRequest> {
        let envelope = SessionInputEnvelope {
            input: SessionInput {
                login: &input.login,
                password: &input.password,
            },
        };
        let body = serde_json::to_string(&envelope).map_err(|e| ClientError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/user/sessions", self.base_url),
            headers: vec![
                ("Accept".to_string(), SESSION_MEDIA_TYPE.to_string()),
                ("Content-Type".to_string(), SESSION_INPUT_MEDIA_TYPE.to_string()),
            ],
            body,
        })
    }

    /// `session_id` is the session href. A root-relative href (the form the
    /// server returns) is joined onto the origin, so an API prefix already
    /// present in the href is not repeated.
    pub fn build_delete_session(&self, session_id: &str) -> HttpRequest {
        let url = if session_id.starts_with('/') {
            format!("{}{session_id}", self.origin)
        } else {
            format!("{}/{session_id}", self.base_url)
        };
        HttpRequest::new(HttpMethod::Delete, url)
    }

    pub fn parse_create_session(&self, response: &HttpResponse) -> Result<Session> {
        check_status(response, &[200, 201])?;
        parse_session_body(&response.body)
    }

    pub fn parse_delete_session(&self, response: &HttpResponse) -> Result<()> {
        check_status(response, &[204])
    }
}

/// Scheme and authority of `url`, without any path.
fn origin_of(url: &str) -> &str {
    let authority_start = url.find("://").map_or(0, |i| i + 3);
    match url[authority_start..].find('/') {
        Some(i) => &url[..authority_start + i],
        None => url,
    }
}

/// Decode the `Session` envelope of a session-create response body.
pub fn parse_session_body(body: &str) -> Result<Session> {
    let envelope: SessionEnvelope =
        serde_json::from_str(body).map_err(|e| ClientError::DeserializationError(e.to_string()))?;
    Ok(envelope.session.into())
}

/// Map non-success statuses to the appropriate `ClientError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<()> {
    match response.status {
        ResponseStatus::Code(status) if expected.contains(&status) => Ok(()),
        ResponseStatus::Code(404) => Err(ClientError::NotFound),
        ResponseStatus::Code(status) => Err(ClientError::HttpError {
            status,
            body: response.body.clone(),
        }),
        ResponseStatus::Error => Err(ClientError::Transport("no response from server".to_string())),
    }
}

/// `UserService` over a live connection.
pub struct RestUserService {
    requests: SessionRequests,
    connection: Box<dyn Connection>,
}

impl RestUserService {
    pub fn new(base_url: &str, connection: Box<dyn Connection>) -> Self {
        Self {
            requests: SessionRequests::new(base_url),
            connection,
        }
    }
}

#[async_trait]
impl UserService for RestUserService {
    fn new_session_create_struct(&self, login: &str, password: &str) -> SessionCreateStruct {
        SessionCreateStruct {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    async fn create_session(&self, input: &SessionCreateStruct) -> Result<HttpResponse> {
        let request = self.requests.build_create_session(input)?;
        debug!(url = %request.url, login = %input.login, "creating session");
        let response = self.connection.execute(request).await?;
        // The agent decodes the body; only the status is checked here.
        check_status(&response, &[200, 201])?;
        Ok(response)
    }

    async fn delete_session(&self, session_id: &str) -> Result<HttpResponse> {
        let request = self.requests.build_delete_session(session_id);
        debug!(url = %request.url, "deleting session");
        let response = self.connection.execute(request).await?;
        self.requests.parse_delete_session(&response)?;
        Ok(response)
    }
}
