//! Transport seam.
//!
//! The core never performs I/O itself. Hosts implement `Connection` over
//! whatever HTTP stack they use and hand the manager a factory for it.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
///
/// Non-success statuses are returned as `Ok` responses; `Err` is reserved
/// for failures where no response was obtained.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Produces the connection a `ConnectionManager` dispatches through.
pub trait ConnectionFactory {
    fn create_connection(&self) -> Box<dyn Connection>;
}

impl<F> ConnectionFactory for F
where
    F: Fn() -> Box<dyn Connection>,
{
    fn create_connection(&self) -> Box<dyn Connection> {
        self()
    }
}
