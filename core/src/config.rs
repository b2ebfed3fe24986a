//! Client configuration.

use serde::Deserialize;

/// Settings for a `ConnectionManager`, loadable from any serde format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// REST root URL that request paths are appended to.
    pub endpoint: String,
    #[serde(default)]
    pub log_requests: bool,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            log_requests: false,
        }
    }
}
