//! Error types for the REST client core.
//!
//! # Design
//! One enum covers the whole crate so the connection manager can wrap any
//! agent failure without conversions. Failures are always returned to the
//! caller; the agent never leaves session state half-updated on an error
//! path.

use thiserror::Error;

use crate::http::HttpResponse;
use crate::types::SessionCreateStruct;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Session creation failed. `context` carries the create struct that was
    /// sent (its password is redacted when formatted).
    #[error("{message}: {reason}")]
    AuthenticationFailed {
        message: String,
        reason: String,
        context: SessionCreateStruct,
    },

    /// The authentication agent rejected a request before dispatch. The
    /// transport was not contacted; `response` is the synthetic error
    /// response handed back in its place.
    #[error("An error occurred during request authentication: {source}")]
    RequestAuthentication {
        #[source]
        source: Box<ClientError>,
        response: HttpResponse,
    },

    /// Deleting the server session failed; local state is unchanged.
    #[error("Failed to delete session {session_id}: {source}")]
    LogoutFailed {
        session_id: String,
        #[source]
        source: Box<ClientError>,
    },

    /// The user service was never injected into the agent.
    #[error("authentication agent is not initialized: no user service set")]
    NotInitialized,

    /// An operation needed a session but none is active.
    #[error("no active session")]
    NotAuthenticated,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-success status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The transport could not complete the round-trip.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ClientError {
    /// The synthetic response attached to a pre-dispatch authentication
    /// failure, if this is one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ClientError::RequestAuthentication { response, .. } => Some(response),
            _ => None,
        }
    }
}
