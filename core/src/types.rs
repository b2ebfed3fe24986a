//! Domain types for the session handshake.
//!
//! # Design
//! `Session` holds name, id and CSRF token together so a half-populated
//! session cannot be represented. Wire DTOs mirror the server's JSON
//! envelopes (`Session`, `SessionInput`) and are kept separate from the
//! mock-server crate; integration tests catch schema drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login credentials supplied to the session agent. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Input for a session-create call, built by the user service from the
/// agent's credentials. Returned as context when the handshake fails.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCreateStruct {
    pub login: String,
    pub password: String,
}

impl From<&Credentials> for SessionCreateStruct {
    fn from(credentials: &Credentials) -> Self {
        Self {
            login: credentials.login.clone(),
            password: credentials.password.clone(),
        }
    }
}

impl fmt::Debug for SessionCreateStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCreateStruct")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated server session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    /// The session resource href; also used to delete the session.
    pub id: String,
    pub csrf_token: String,
}

/// Body of a successful session-create response.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionEnvelope {
    #[serde(rename = "Session")]
    pub session: SessionPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub name: String,
    #[serde(rename = "_href")]
    pub href: String,
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        Self {
            name: payload.name,
            id: payload.href,
            csrf_token: payload.csrf_token,
        }
    }
}

/// Body of a session-create request.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInputEnvelope<'a> {
    #[serde(rename = "SessionInput")]
    pub input: SessionInput<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInput<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_envelope_ignores_extra_fields() {
        let body = r#"{"Session":{"name":"eZSESSID","identifier":"abc","_href":"/user/sessions/abc","_media-type":"application/vnd.ez.api.Session+json","csrfToken":"tok"}}"#;
        let envelope: SessionEnvelope = serde_json::from_str(body).unwrap();
        let session = Session::from(envelope.session);
        assert_eq!(session.name, "eZSESSID");
        assert_eq!(session.id, "/user/sessions/abc");
        assert_eq!(session.csrf_token, "tok");
    }

    #[test]
    fn session_envelope_requires_csrf_token() {
        let body = r#"{"Session":{"name":"n","_href":"/s/1"}}"#;
        assert!(serde_json::from_str::<SessionEnvelope>(body).is_err());
    }

    #[test]
    fn session_input_serializes_wrapped() {
        let envelope = SessionInputEnvelope {
            input: SessionInput {
                login: "admin",
                password: "publish",
            },
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["SessionInput"]["login"], "admin");
        assert_eq!(json["SessionInput"]["password"], "publish");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("alice", "pw-secret"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("pw-secret"));
    }
}
