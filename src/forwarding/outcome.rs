//! Terminal outcomes of a gateway request.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Metrics label for requests that never reached a registered service.
pub const UNRESOLVED_SERVICE: &str = "unresolved";

/// A completed upstream exchange, whatever its status code.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Anything that kept the upstream exchange from completing.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid target url {url}: {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: axum::http::Error,
    },

    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] axum::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Exactly one of these is produced per inbound request.
#[derive(Debug)]
pub enum ForwardOutcome {
    Success(UpstreamResponse),
    TransportFailure(TransportError),
    ServiceUnresolved { service: String },
    QuotaExceeded { retry_after: Duration },
}

impl ForwardOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ForwardOutcome::Success(_) => "success",
            ForwardOutcome::TransportFailure(_) => "transport_failure",
            ForwardOutcome::ServiceUnresolved { .. } => "service_unresolved",
            ForwardOutcome::QuotaExceeded { .. } => "quota_exceeded",
        }
    }

    /// Service name to attach to metrics. Only names the registry resolved
    /// are used; anything else collapses to [`UNRESOLVED_SERVICE`].
    pub fn metrics_service<'a>(&self, requested: &'a str) -> &'a str {
        match self {
            ForwardOutcome::Success(_) | ForwardOutcome::TransportFailure(_) => requested,
            ForwardOutcome::ServiceUnresolved { .. } | ForwardOutcome::QuotaExceeded { .. } => {
                UNRESOLVED_SERVICE
            }
        }
    }
}
