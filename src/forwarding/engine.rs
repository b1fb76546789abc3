//! Upstream dispatch.
//!
//! One attempt per request: no retries, no redirect following. The timeout
//! covers connecting, the response head, and reading the response body.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::config::ForwardingConfig;
use crate::discovery::ServiceInstance;
use crate::forwarding::headers::{strip_hop_by_hop, HeaderPolicy, HeaderPolicyError};
use crate::forwarding::outcome::{ForwardOutcome, TransportError, UpstreamResponse};
use crate::forwarding::target::target_url;
use crate::http::request::RouteRequest;
use crate::observability::metrics;

pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    headers: HeaderPolicy,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(headers: HeaderPolicy, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            headers,
            timeout,
        }
    }

    pub fn from_config(config: &ForwardingConfig) -> Result<Self, HeaderPolicyError> {
        Ok(Self::new(HeaderPolicy::from_config(config)?, config.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` to `target` and fold the result into an outcome.
    ///
    /// Upstream error statuses are a `Success`; only transport problems are
    /// a `TransportFailure`, and their cause is only logged.
    pub async fn forward(&self, request: &RouteRequest, target: &ServiceInstance) -> ForwardOutcome {
        let url = target_url(target, &request.path, request.query.as_deref());
        let started = Instant::now();

        match self.exchange(request, &url).await {
            Ok(response) => {
                tracing::debug!(
                    service = %request.service,
                    url = %url,
                    status = %response.status,
                    elapsed = ?started.elapsed(),
                    "Upstream responded"
                );
                ForwardOutcome::Success(response)
            }
            Err(e) => {
                tracing::error!(
                    service = %request.service,
                    url = %url,
                    error = %e,
                    "Gateway forwarding failed"
                );
                metrics::record_upstream_failure(&request.service);
                ForwardOutcome::TransportFailure(e)
            }
        }
    }

    async fn exchange(
        &self,
        request: &RouteRequest,
        url: &str,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut builder = Request::builder().method(request.method.clone()).uri(url);
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers.outbound(&request.headers, request.client_ip);
        }
        let outbound = builder
            .body(Body::from(request.body.clone()))
            .map_err(|source| TransportError::InvalidTarget {
                url: url.to_string(),
                source,
            })?;

        let exchange = async {
            let response = self.client.request(outbound).await?;
            let (mut parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), usize::MAX).await?;
            strip_hop_by_hop(&mut parts.headers);

            Ok::<_, TransportError>(UpstreamResponse {
                status: parts.status,
                headers: parts.headers,
                body,
            })
        };

        time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}
