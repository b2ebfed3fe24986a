//! Session-authenticated REST client core.
//!
//! # Overview
//! A `ConnectionManager` turns request parameters into `HttpRequest`
//! values, passes them through an `AuthenticationAgent`, and dispatches the
//! result over a host-supplied `Connection`. `SessionAuthAgent` logs in by
//! creating a server session, persists it in a `SessionStorage`, and attaches
//! the session's CSRF token to every state-changing request.
//!
//! # Design
//! - The core performs no I/O. Transport, user service and storage are
//!   traits implemented by the host (or by tests).
//! - Callbacks are futures: each operation resolves exactly once.
//! - The session record is all-or-nothing, both in memory and in storage.

pub mod agent;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod manager;
pub mod session_agent;
pub mod storage;
pub mod types;
pub mod user_service;

pub use agent::AuthenticationAgent;
pub use config::ClientConfig;
pub use connection::{Connection, ConnectionFactory};
pub use error::{ClientError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseStatus};
pub use manager::{ConnectionManager, RequestParams};
pub use session_agent::{SessionAuthAgent, CSRF_HEADER};
pub use storage::{MemoryStorage, SessionStorage};
pub use types::{Credentials, Session, SessionCreateStruct};
pub use user_service::{RestUserService, SessionRequests, UserService};
