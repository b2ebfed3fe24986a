//! The authentication seam between the connection manager and whatever
//! strategy keeps requests authorized.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::HttpRequest;

/// Strategy that makes outbound requests acceptable to the server.
///
/// `SessionAuthAgent` is the session/CSRF implementation; other strategies
/// (bearer tokens, anonymous access) plug in without touching the
/// connection manager.
#[async_trait]
pub trait AuthenticationAgent: Send + Sync {
    /// Make sure credentials are established. Resolves to `Ok(true)` once
    /// the agent is authenticated.
    async fn ensure_authentication(&self) -> Result<bool>;

    /// Prepare `request` for dispatch. An `Err` stops the request before it
    /// reaches the transport.
    async fn authenticate_request(&self, request: HttpRequest) -> Result<HttpRequest>;

    /// Drop the established credentials, locally and on the server.
    async fn log_out(&self) -> Result<bool>;
}
