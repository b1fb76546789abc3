//! Health registry client.
//!
//! Queries `GET {base}/v1/health/service/{name}?passing=1` and decodes the
//! entries. Every call is a fresh request; nothing is cached.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::discovery::instance::HealthEntry;

/// Why a registry query produced no usable answer.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry base url cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("registry responded with status {0}")]
    Status(StatusCode),

    #[error("malformed registry response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for a Consul-compatible health endpoint.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    /// Build a client for `base_url` with a per-query timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let base_url =
            Url::parse(base_url).map_err(|_| RegistryError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self { http, base_url })
    }

    /// URL of the passing-instances query for `service`.
    ///
    /// The service name is appended as one percent-encoded segment, so a name
    /// containing `/` or `?` cannot reach another registry endpoint.
    pub fn health_url(&self, service: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "health", "service", service]);
        }
        url.set_query(Some("passing=1"));
        url
    }

    /// Fetch the passing instances registered for `service`.
    pub async fn passing_instances(&self, service: &str) -> Result<Vec<HealthEntry>, RegistryError> {
        let url = self.health_url(service);
        tracing::debug!(service = %service, url = %url, "Querying registry");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
