//! Connection manager: builds requests, runs them through the
//! authentication agent and dispatches them to the transport.
//!
//! # Design
//! The manager holds one connection for its lifetime, created by the
//! factory at construction. Authentication always completes before
//! dispatch; an agent failure short-circuits into a synthetic error response
//! and the transport is never contacted. There is no retry and no timeout
//! at this layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::agent::AuthenticationAgent;
use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionFactory};
use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Parameters of a single request. `Default` gives `GET /` with an empty
/// body and no headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub method: HttpMethod,
    pub path: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            path: "/".to_string(),
            body: String::new(),
            headers: Vec::new(),
        }
    }
}

impl RequestParams {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct ConnectionManager {
    endpoint: String,
    agent: Arc<dyn AuthenticationAgent>,
    connection: Box<dyn Connection>,
    log_requests: AtomicBool,
}

impl ConnectionManager {
    pub fn new(endpoint: &str, agent: Arc<dyn AuthenticationAgent>, factory: &dyn ConnectionFactory) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent,
            connection: factory.create_connection(),
            log_requests: AtomicBool::new(false),
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        agent: Arc<dyn AuthenticationAgent>,
        factory: &dyn ConnectionFactory,
    ) -> Self {
        let manager = Self::new(&config.endpoint, agent, factory);
        manager.set_log_requests(config.log_requests);
        manager
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn agent(&self) -> &Arc<dyn AuthenticationAgent> {
        &self.agent
    }

    /// Log every authenticated request before dispatch. Diagnostic only.
    pub fn set_log_requests(&self, enabled: bool) {
        self.log_requests.store(enabled, Ordering::Relaxed);
    }

    pub fn log_requests(&self) -> bool {
        self.log_requests.load(Ordering::Relaxed)
    }

    /// Absolute URL for `path`. The endpoint's trailing slashes are
    /// stripped at construction; a path without a leading slash gets one.
    /// Nothing else is normalized.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.endpoint)
        } else {
            format!("{}/{path}", self.endpoint)
        }
    }

    pub async fn request(&self, params: RequestParams) -> Result<HttpResponse> {
        let request = HttpRequest {
            method: params.method,
            url: self.url_for(&params.path),
            headers: params.headers,
            body: params.body,
        };

        let request = match self.agent.authenticate_request(request).await {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "request authentication failed");
                return Err(ClientError::RequestAuthentication {
                    source: Box::new(e),
                    response: HttpResponse::synthetic_error(),
                });
            }
        };

        if self.log_requests() {
            info!(method = %request.method, url = %request.url, headers = ?request.headers, "dispatching request");
        }
        self.connection.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.request(RequestParams::new(HttpMethod::Get, path)).await
    }

    pub async fn post(&self, path: &str, body: impl Into<String>) -> Result<HttpResponse> {
        self.request(RequestParams::new(HttpMethod::Post, path).body(body)).await
    }

    pub async fn put(&self, path: &str, body: impl Into<String>) -> Result<HttpResponse> {
        self.request(RequestParams::new(HttpMethod::Put, path).body(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
        self.request(RequestParams::new(HttpMethod::Delete, path)).await
    }

    pub async fn log_out(&self) -> Result<bool> {
        self.agent.log_out().await
    }
}
